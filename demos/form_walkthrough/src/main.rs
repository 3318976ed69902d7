use std::rc::Rc;

use formwork_cells::*;
use formwork_core::*;

fn print_list(list: &CellList) {
    for (i, cell) in list.iter().enumerate() {
        let Some(row) = cell.base_row() else {
            println!("{i:>2}  <unbound>");
            continue;
        };
        let marker = if cell.is_input_focus() { '>' } else { ' ' };
        println!(
            "{i:>2}{marker} {:<14} {:>12}   h={}",
            row.title().unwrap_or_default(),
            row.detail_text(),
            cell.height()
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting form walkthrough");

    let tree = Hierarchy::new();
    let host = tree.insert("form");
    let tracker = Rc::new(EditingTracker::new());
    let controller: Rc<dyn FormController> = tracker.clone();
    install_controller(&tree, host, &controller)?;
    tracker.set_accessory("email", AccessoryView::Custom("email-keys".into()));

    let name = Row::<String>::new("Name").tag("name").into_ref();
    let email = Row::<String>::new("Email").tag("email").into_ref();
    let age = Row::new("Age")
        .value(30u32)
        .display_value(|v| v.map(|n| format!("{n} yrs")))
        .into_ref();
    let newsletter = Row::new("Newsletter")
        .value(false)
        .on_cell_selection(|cell, row| {
            let on = row.borrow().value.unwrap_or(false);
            row.borrow_mut().set_value(Some(!on));
            cell.update();
        })
        .into_ref();
    let plan = Row::new("Plan")
        .value("Free".to_string())
        .disabled(true)
        .into_ref();

    let mut list = CellList::new(&tree, Some(host))?;
    for (row, focusable) in [(&name, true), (&email, true), (&plan, false)] {
        let cell = TypedCell::new(&tree).with_input_focus(focusable);
        cell.bind(row);
        list.push(Box::new(cell))?;
    }
    let age_cell = TypedCell::new(&tree);
    age_cell.bind(&age);
    list.push(Box::new(age_cell))?;
    let toggle = TypedCell::new(&tree);
    toggle.bind(&newsletter);
    list.push(Box::new(toggle))?;

    list.setup_all();
    list.update_all();
    println!("-- initial");
    print_list(&list);

    for i in 0..list.len() {
        if let Some(cell) = list.typed::<String>(i) {
            let frames = cell.layout(320.0)?;
            log::debug!("cell {i}: title {:?} detail {:?}", frames.title, frames.detail);
        }
    }

    if let Some(first) = list.get(0) {
        first.become_input_focus(None);
    }
    name.borrow_mut().set_value(Some("Alice".into()));
    list.update_all();
    list.focus_next(0, FocusDirection::Down);
    if let Some(i) = list.focused_index()
        && let Some(cell) = list.get(i)
    {
        println!("accessory for {i}: {:?}", cell.input_accessory_view());
    }
    list.select(4);
    println!("-- after editing");
    print_list(&list);

    set_preferred_content_size(ContentSizeCategory::ExtraExtraLarge);
    println!("-- after text size change");
    print_list(&list);

    println!("editing events: {:?}", tracker.events());
    Ok(())
}
