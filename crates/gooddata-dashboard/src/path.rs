//! Addressing items through nested layouts.

use serde::{Deserialize, Serialize};

use crate::builder::DashboardLayoutBuilder;
use crate::error::{LayoutError, Result};
use crate::layout::{DashboardLayout, DashboardLayoutItem, LayoutWidget};

/// Position of an item within one layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutCoordinates {
    pub section: usize,
    pub item: usize,
}

impl LayoutCoordinates {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// Each step but the last must land on an item holding a nested layout.
pub type LayoutPath = [LayoutCoordinates];

pub fn layout_item_at<'a>(
    layout: &'a DashboardLayout,
    path: &LayoutPath,
) -> Option<&'a DashboardLayoutItem> {
    let (first, rest) = path.split_first()?;
    let item = layout.sections.get(first.section)?.items.get(first.item)?;
    if rest.is_empty() {
        return Some(item);
    }
    match &item.widget {
        Some(LayoutWidget::Layout(nested)) => layout_item_at(nested, rest),
        _ => None,
    }
}

/// Returns a copy of `layout` with the item at `path` replaced by `update(item)`.
///
/// Only the lists on the way to the item are copied; every other section and item list is shared
/// with `layout`.
pub fn with_item_change<F>(
    layout: &DashboardLayout,
    path: &LayoutPath,
    update: F,
) -> Result<DashboardLayout>
where
    F: FnOnce(&DashboardLayoutItem) -> DashboardLayoutItem,
{
    let Some((first, rest)) = path.split_first() else {
        return Err(LayoutError::InvalidInput("empty layout path".to_string()));
    };

    let mut builder = DashboardLayoutBuilder::for_layout(layout);
    builder.modify_section(first.section, |section| {
        section.modify_item(first.item, |item| {
            let current = item.build();
            let replacement = if rest.is_empty() {
                update(&current)
            } else {
                let Some(LayoutWidget::Layout(nested)) = &current.widget else {
                    return Err(LayoutError::InvalidInput(format!(
                        "item at section {}, index {} is not a nested layout",
                        first.section, first.item
                    )));
                };
                DashboardLayoutItem {
                    size: current.size.clone(),
                    widget: Some(LayoutWidget::Layout(with_item_change(nested, rest, update)?)),
                }
            };
            item.set_item(replacement);
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DashboardLayoutSection, ItemSizeByScreen};
    use std::sync::Arc;

    fn leaf(width: u32) -> DashboardLayoutItem {
        DashboardLayoutItem {
            size: ItemSizeByScreen::xl(width),
            widget: None,
        }
    }

    fn nested_layout() -> DashboardLayout {
        let inner = DashboardLayout::new(vec![DashboardLayoutSection::new(vec![leaf(3), leaf(9)])]);
        DashboardLayout::new(vec![
            DashboardLayoutSection::new(vec![DashboardLayoutItem {
                size: ItemSizeByScreen::xl(12),
                widget: Some(LayoutWidget::Layout(inner)),
            }]),
            DashboardLayoutSection::new(vec![leaf(6)]),
        ])
    }

    #[test]
    fn query_through_nested_layouts() {
        let layout = nested_layout();
        let path = [LayoutCoordinates::new(0, 0), LayoutCoordinates::new(0, 1)];
        assert_eq!(layout_item_at(&layout, &path), Some(&leaf(9)));
        assert_eq!(
            layout_item_at(&layout, &[LayoutCoordinates::new(1, 0), LayoutCoordinates::new(0, 0)]),
            None
        );
        assert_eq!(layout_item_at(&layout, &[]), None);
    }

    #[test]
    fn change_shares_untouched_subtrees() {
        let layout = nested_layout();
        let path = [LayoutCoordinates::new(0, 0), LayoutCoordinates::new(0, 1)];

        let changed = with_item_change(&layout, &path, |_| leaf(1)).unwrap();

        assert_eq!(layout_item_at(&changed, &path), Some(&leaf(1)));
        assert_eq!(layout_item_at(&layout, &path), Some(&leaf(9)));
        assert!(!Arc::ptr_eq(&layout.sections, &changed.sections));
        assert!(!Arc::ptr_eq(&layout.sections[0].items, &changed.sections[0].items));
        assert!(Arc::ptr_eq(&layout.sections[1].items, &changed.sections[1].items));
    }

    #[test]
    fn change_requires_nested_layout_on_the_way() {
        let layout = nested_layout();
        let err = with_item_change(
            &layout,
            &[LayoutCoordinates::new(1, 0), LayoutCoordinates::new(0, 0)],
            |item| item.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput(_)));
    }
}
