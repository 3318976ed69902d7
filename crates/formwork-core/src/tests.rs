#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));

        assert_eq!(Color::from_hex("nope"), Color(0, 0, 0, 255));
        assert_eq!(Color(255, 87, 51, 255).to_hex(), "#FF5733");
    }

    #[test]
    fn test_rect_contains_and_overlaps() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));

        let right = Rect::new(110.0, 10.0, 20.0, 50.0);
        assert!(!rect.overlaps(&right));
        assert!(rect.overlaps(&right.offset(-1.0, 0.0)));
    }

    #[test]
    fn test_find_ancestor_walks_parents() {
        let mut tree = ResponderTree::new();
        let host = tree.insert("host");
        tree.set_payload(host, 7u32).unwrap();
        let list = tree.insert_child(host, "list").unwrap();
        let cell = tree.insert_child(list, "cell").unwrap();

        assert_eq!(tree.find_ancestor::<u32>(cell), Some(7));
        assert_eq!(tree.depth(cell), 2);
        assert_eq!(tree.ancestors(cell).collect::<Vec<_>>(), vec![cell, list, host]);
    }

    #[test]
    fn test_find_ancestor_starts_at_self_and_stops_at_nearest() {
        let mut tree = ResponderTree::new();
        let outer = tree.insert("outer");
        tree.set_payload(outer, "outer").unwrap();
        let inner = tree.insert_child(outer, "inner").unwrap();
        tree.set_payload(inner, "inner").unwrap();

        assert_eq!(tree.find_ancestor::<&str>(inner), Some("inner"));
        tree.clear_payload(inner);
        assert_eq!(tree.find_ancestor::<&str>(inner), Some("outer"));
    }

    #[test]
    fn test_detached_and_removed_nodes_find_nothing() {
        let tree = Hierarchy::new();
        let host = tree.insert("host");
        tree.set_payload(host, 1i32).unwrap();
        let cell = tree.insert_child(host, "cell").unwrap();

        tree.detach(cell).unwrap();
        assert_eq!(tree.find_ancestor::<i32>(cell), None);

        // reattaching is picked up, nothing cached
        tree.attach(cell, host).unwrap();
        assert_eq!(tree.find_ancestor::<i32>(cell), Some(1));

        assert_eq!(tree.remove(host), 2);
        assert!(!tree.contains(cell));
        assert_eq!(tree.find_ancestor::<i32>(cell), None);
    }

    #[test]
    fn test_attach_rejects_cycles_and_unknown_nodes() {
        let mut tree = ResponderTree::new();
        let a = tree.insert("a");
        let b = tree.insert_child(a, "b").unwrap();

        assert_eq!(
            tree.attach(a, b),
            Err(HierarchyError::Cycle { child: a, parent: b })
        );
        assert_eq!(
            tree.attach(a, a),
            Err(HierarchyError::Cycle { child: a, parent: a })
        );

        tree.remove(b);
        assert_eq!(tree.attach(a, b), Err(HierarchyError::UnknownNode(b)));
        assert!(tree.children(a).is_empty());
    }

    #[test]
    fn test_attach_moves_between_parents() {
        let mut tree = ResponderTree::new();
        let first = tree.insert("first");
        let second = tree.insert("second");
        let cell = tree.insert_child(first, "cell").unwrap();

        tree.attach(cell, second).unwrap();
        assert!(tree.children(first).is_empty());
        assert_eq!(tree.children(second), &[cell]);
        assert_eq!(tree.parent(cell), Some(second));
    }

    #[test]
    fn test_first_responder_tracking() {
        let mut tree = ResponderTree::new();
        let a = tree.insert("a");
        let b = tree.insert("b");

        assert_eq!(tree.make_first_responder(a), Ok(None));
        assert_eq!(tree.make_first_responder(b), Ok(Some(a)));
        assert_eq!(tree.make_first_responder(b), Ok(None));
        assert_eq!(tree.first_responder(), Some(b));

        assert!(!tree.resign_first_responder(a));
        assert!(tree.resign_first_responder(b));
        assert_eq!(tree.first_responder(), None);

        tree.make_first_responder(a).unwrap();
        tree.remove(a);
        assert_eq!(tree.first_responder(), None);
        assert_eq!(
            tree.make_first_responder(a),
            Err(HierarchyError::UnknownNode(a))
        );
    }

    #[test]
    fn test_subscription_released_on_drop() {
        let kind = Notification::ContentSizeCategoryChanged;
        let hits = Rc::new(RefCell::new(0));

        let sub = {
            let hits = hits.clone();
            subscribe(kind, move || *hits.borrow_mut() += 1)
        };
        assert_eq!(subscriber_count(kind), 1);

        post(kind);
        assert_eq!(*hits.borrow(), 1);

        drop(sub);
        assert_eq!(subscriber_count(kind), 0);
        post(kind);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_post_tolerates_unsubscribe_during_delivery() {
        let kind = Notification::ContentSizeCategoryChanged;
        let second_hits = Rc::new(RefCell::new(0));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _first = {
            let second = second.clone();
            subscribe(kind, move || {
                second.borrow_mut().take();
            })
        };
        *second.borrow_mut() = Some({
            let hits = second_hits.clone();
            subscribe(kind, move || *hits.borrow_mut() += 1)
        });

        post(kind);
        assert_eq!(*second_hits.borrow(), 0);
        assert_eq!(subscriber_count(kind), 1);
    }

    #[test]
    fn test_content_size_change_posts_once() {
        let hits = Rc::new(RefCell::new(0));
        let _sub = {
            let hits = hits.clone();
            subscribe(Notification::ContentSizeCategoryChanged, move || {
                *hits.borrow_mut() += 1
            })
        };

        set_preferred_content_size(ContentSizeCategory::ExtraLarge);
        set_preferred_content_size(ContentSizeCategory::ExtraLarge);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(preferred_content_size(), ContentSizeCategory::ExtraLarge);

        set_preferred_content_size(ContentSizeCategory::Large);
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn test_locals_scoping() {
        let custom = Theme {
            text: Color::WHITE,
            ..Theme::default()
        };
        with_theme(custom, || {
            assert_eq!(theme().text, Color::WHITE);
            with_text_scale(TextScale(2.0), || {
                assert_eq!(scaled_font_px(10.0), 20.0);
                assert_eq!(theme().text, Color::WHITE);
            });
        });
        assert_eq!(theme(), Theme::default());
        assert_eq!(scaled_font_px(10.0), 10.0);
    }
}
