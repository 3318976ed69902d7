//! Per-cell layout constraints.
//!
//! A programmatic cell owns a small constraint set that pins its two label
//! slots inside the content area. On every layout pass the whole set is
//! dropped and rebuilt from [`CellMetrics`]; there is no diffing, so the set is
//! always either empty or exactly [`ConstraintManager::standard`].
//!
//! Cells created from a template come with their frames already decided; their
//! manager is [`LayoutMode::Templated`] and never holds constraints.
//!
//! Resolution goes through taffy: the constraint constants become padding and
//! gap of a single flex row, and compression resistance decides which slot is
//! allowed to shrink.

use formwork_core::{Rect, Size};
use smallvec::SmallVec;
use taffy::TaffyTree;
use taffy::prelude::length;
use taffy::style::{AlignItems, Display, FlexDirection, JustifyContent, Style};

use crate::error::LayoutError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u16);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000);
    pub const HIGH: Priority = Priority(750);
    pub const LOW: Priority = Priority(250);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    Content,
    Title,
    Detail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Leading,
    Trailing,
    Top,
    Bottom,
    CenterY,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

/// `item.attribute  relation  target.target_attribute + constant`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    pub item: Item,
    pub attribute: Attribute,
    pub relation: Relation,
    pub target: Item,
    pub target_attribute: Attribute,
    pub constant: f32,
    pub priority: Priority,
}

impl Constraint {
    fn pin(item: Item, attribute: Attribute, relation: Relation, constant: f32) -> Self {
        Self {
            item,
            attribute,
            relation,
            target: Item::Content,
            target_attribute: attribute,
            constant,
            priority: Priority::REQUIRED,
        }
    }
}

/// Spacing and sizing shared by every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellMetrics {
    /// Leading/trailing inset of the slots.
    pub horizontal_gap: f32,
    /// Minimum top/bottom inset of the slots.
    pub vertical_gap: f32,
    /// Minimum distance between title and detail.
    pub interitem_gap: f32,
    pub min_height: f32,
    /// Base font size before content size scaling.
    pub font_px: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            horizontal_gap: 15.0,
            vertical_gap: 11.0,
            interitem_gap: 8.0,
            min_height: 44.0,
            font_px: 17.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    Templated,
    Programmatic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotFrames {
    pub title: Rect,
    pub detail: Rect,
}

/// Compression resistance of both slots; the lower one shrinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compression {
    pub title: Priority,
    pub detail: Priority,
}

pub type ConstraintSet = SmallVec<[Constraint; 9]>;

#[derive(Debug)]
pub struct ConstraintManager {
    mode: LayoutMode,
    active: ConstraintSet,
    rebuilds: u64,
}

impl ConstraintManager {
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            active: SmallVec::new(),
            rebuilds: 0,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn active(&self) -> &[Constraint] {
        &self.active
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// The full set for `metrics`: both slots pinned to their edge and
    /// centred, title kept clear of detail.
    pub fn standard(metrics: &CellMetrics) -> ConstraintSet {
        use Attribute::*;
        use Relation::*;

        let h = metrics.horizontal_gap;
        let v = metrics.vertical_gap;
        let mut set = ConstraintSet::new();
        set.push(Constraint::pin(Item::Title, Leading, Equal, h));
        set.push(Constraint::pin(Item::Title, CenterY, Equal, 0.0));
        set.push(Constraint::pin(Item::Title, Top, GreaterOrEqual, v));
        set.push(Constraint::pin(Item::Title, Bottom, LessOrEqual, -v));
        set.push(Constraint::pin(Item::Detail, Trailing, Equal, -h));
        set.push(Constraint::pin(Item::Detail, CenterY, Equal, 0.0));
        set.push(Constraint::pin(Item::Detail, Top, GreaterOrEqual, v));
        set.push(Constraint::pin(Item::Detail, Bottom, LessOrEqual, -v));
        set.push(Constraint {
            item: Item::Title,
            attribute: Trailing,
            relation: LessOrEqual,
            target: Item::Detail,
            target_attribute: Leading,
            constant: -metrics.interitem_gap,
            priority: Priority::REQUIRED,
        });
        set
    }

    /// Drops every tracked constraint and installs a fresh standard set.
    /// Does nothing for templated cells.
    pub fn update_constraints(&mut self, metrics: &CellMetrics) {
        if self.mode == LayoutMode::Templated {
            return;
        }
        let removed = self.active.len();
        self.active.clear();
        self.active.extend(Self::standard(metrics));
        self.rebuilds += 1;
        log::trace!(
            "constraints rebuilt (removed {removed}, installed {}, pass {})",
            self.active.len(),
            self.rebuilds
        );
    }

    /// Invariant check: empty, or exactly the set `metrics` calls for.
    pub fn matches(&self, metrics: &CellMetrics) -> bool {
        self.active.is_empty() || self.active == Self::standard(metrics)
    }

    fn constant(&self, item: Item, attribute: Attribute) -> Result<f32, LayoutError> {
        self.active
            .iter()
            .find(|c| c.item == item && c.attribute == attribute)
            .map(|c| c.constant)
            .ok_or(LayoutError::MissingConstraint(item, attribute))
    }

    /// Frames of both slots inside `content`, from the active set.
    pub fn resolve(
        &self,
        content: Rect,
        title: Size,
        detail: Size,
        compression: Compression,
    ) -> Result<SlotFrames, LayoutError> {
        if self.mode == LayoutMode::Templated {
            return Err(LayoutError::Templated);
        }
        let leading = self.constant(Item::Title, Attribute::Leading)?;
        let trailing = -self.constant(Item::Detail, Attribute::Trailing)?;
        let top = self.constant(Item::Title, Attribute::Top)?;
        let bottom = -self.constant(Item::Title, Attribute::Bottom)?;
        let spacing = -self.constant(Item::Title, Attribute::Trailing)?;

        let (title_shrink, detail_shrink) = match compression.title.cmp(&compression.detail) {
            std::cmp::Ordering::Less => (1.0, 0.0),
            std::cmp::Ordering::Greater => (0.0, 1.0),
            std::cmp::Ordering::Equal => (1.0, 1.0),
        };

        let mut tree: TaffyTree<()> = TaffyTree::new();
        tree.disable_rounding();

        let leaf = |size: Size, shrink: f32| Style {
            size: taffy::geometry::Size {
                width: length(size.width),
                height: length(size.height),
            },
            min_size: taffy::geometry::Size {
                width: length(0.0),
                height: length(0.0),
            },
            flex_grow: 0.0,
            flex_shrink: shrink,
            ..Default::default()
        };
        let title_node = tree.new_leaf(leaf(title, title_shrink))?;
        let detail_node = tree.new_leaf(leaf(detail, detail_shrink))?;

        let root = tree.new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Row,
                justify_content: Some(JustifyContent::SpaceBetween),
                align_items: Some(AlignItems::Center),
                size: taffy::geometry::Size {
                    width: length(content.w),
                    height: length(content.h),
                },
                padding: taffy::geometry::Rect {
                    left: length(leading),
                    right: length(trailing),
                    top: length(top),
                    bottom: length(bottom),
                },
                gap: taffy::geometry::Size {
                    width: length(spacing),
                    height: length(0.0),
                },
                ..Default::default()
            },
            &[title_node, detail_node],
        )?;

        tree.compute_layout(
            root,
            taffy::geometry::Size {
                width: taffy::style::AvailableSpace::Definite(content.w),
                height: taffy::style::AvailableSpace::Definite(content.h),
            },
        )?;

        let frame_of = |node| -> Result<Rect, LayoutError> {
            let l = tree.layout(node)?;
            Ok(Rect::new(
                content.x + l.location.x,
                content.y + l.location.y,
                l.size.width,
                l.size.height,
            ))
        };

        Ok(SlotFrames {
            title: frame_of(title_node)?,
            detail: frame_of(detail_node)?,
        })
    }
}
