//! Copy-on-write layout builder.
//!
//! The builder starts from a cheap clone of a layout (only the top-level `Arc`s are copied).
//! Every mutation allocates a new item list for the touched section and a new section list for
//! the layout, so layouts handed out earlier never observe a change.

use std::sync::Arc;

use crate::error::{LayoutError, Result};
use crate::facade::{DashboardLayoutFacade, ItemFacade, SectionFacade};
use crate::layout::{
    DashboardLayout, DashboardLayoutItem, DashboardLayoutSection, ItemSizeByScreen, LayoutWidget,
    SectionHeader,
};

fn out_of_bounds(what: &str, index: usize, len: usize) -> LayoutError {
    LayoutError::InvalidInput(format!("{what} index {index} out of bounds (len {len})"))
}

fn insert_at<T>(list: &mut Vec<T>, value: T, index: Option<usize>, what: &str) -> Result<()> {
    let index = index.unwrap_or(list.len());
    if index > list.len() {
        return Err(out_of_bounds(what, index, list.len()));
    }
    list.insert(index, value);
    Ok(())
}

fn move_within<T>(list: &mut Vec<T>, from: usize, to: usize, what: &str) -> Result<()> {
    if from >= list.len() {
        return Err(out_of_bounds(what, from, list.len()));
    }
    if to >= list.len() {
        return Err(out_of_bounds(what, to, list.len()));
    }
    let value = list.remove(from);
    list.insert(to, value);
    Ok(())
}

#[derive(Clone, Debug, Default)]
pub struct DashboardLayoutBuilder {
    layout: DashboardLayout,
}

impl DashboardLayoutBuilder {
    pub fn for_layout(layout: &DashboardLayout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    pub fn size(&mut self, size: Option<ItemSizeByScreen>) -> &mut Self {
        self.layout.size = size;
        self
    }

    /// Inserts a section at `index`, or appends it when `index` is `None`.
    pub fn add_section(
        &mut self,
        section: DashboardLayoutSection,
        index: Option<usize>,
    ) -> Result<&mut Self> {
        self.update_sections(|sections| insert_at(sections, section, index, "section"))?;
        Ok(self)
    }

    pub fn modify_section(
        &mut self,
        index: usize,
        modify: impl FnOnce(&mut SectionBuilder<'_>) -> Result<()>,
    ) -> Result<&mut Self> {
        let mut section = SectionBuilder::for_section(self, index)?;
        modify(&mut section)?;
        Ok(self)
    }

    pub fn remove_section(&mut self, index: usize) -> Result<&mut Self> {
        self.update_sections(|sections| {
            if index >= sections.len() {
                return Err(out_of_bounds("section", index, sections.len()));
            }
            sections.remove(index);
            Ok(())
        })?;
        Ok(self)
    }

    pub fn move_section(&mut self, from: usize, to: usize) -> Result<&mut Self> {
        self.update_sections(|sections| move_within(sections, from, to, "section"))?;
        Ok(self)
    }

    /// Drops sections without items.
    pub fn remove_empty_sections(&mut self) -> &mut Self {
        if self.layout.sections.iter().any(|s| s.items.is_empty()) {
            let sections: Vec<_> = self
                .layout
                .sections
                .iter()
                .filter(|s| !s.items.is_empty())
                .cloned()
                .collect();
            log::debug!(
                "removed {} empty sections",
                self.layout.sections.len() - sections.len()
            );
            self.layout.sections = Arc::new(sections);
        }
        self
    }

    pub fn facade(&self) -> DashboardLayoutFacade<'_> {
        DashboardLayoutFacade::for_layout(&self.layout)
    }

    pub fn build(&self) -> DashboardLayout {
        self.layout.clone()
    }

    fn update_sections(
        &mut self,
        update: impl FnOnce(&mut Vec<DashboardLayoutSection>) -> Result<()>,
    ) -> Result<()> {
        let mut sections = self.layout.sections.as_ref().clone();
        update(&mut sections)?;
        self.layout.sections = Arc::new(sections);
        Ok(())
    }

    fn set_section(&mut self, index: usize, section: DashboardLayoutSection) {
        let mut sections = self.layout.sections.as_ref().clone();
        sections[index] = section;
        self.layout.sections = Arc::new(sections);
    }
}

/// Modifies one section of a layout builder.
pub struct SectionBuilder<'a> {
    layout: &'a mut DashboardLayoutBuilder,
    index: usize,
}

impl<'a> SectionBuilder<'a> {
    pub fn for_section(layout: &'a mut DashboardLayoutBuilder, index: usize) -> Result<Self> {
        let len = layout.layout.sections.len();
        if index >= len {
            return Err(out_of_bounds("section", index, len));
        }
        Ok(Self { layout, index })
    }

    fn section(&self) -> &DashboardLayoutSection {
        &self.layout.layout.sections[self.index]
    }

    pub fn header(&mut self, header: Option<SectionHeader>) -> &mut Self {
        let section = DashboardLayoutSection {
            header,
            items: Arc::clone(&self.section().items),
        };
        self.set_section(section)
    }

    pub fn add_item(&mut self, item: DashboardLayoutItem, index: Option<usize>) -> Result<&mut Self> {
        self.update_items(|items| insert_at(items, item, index, "item"))?;
        Ok(self)
    }

    pub fn modify_item(
        &mut self,
        index: usize,
        modify: impl FnOnce(&mut ItemBuilder<'_>) -> Result<()>,
    ) -> Result<&mut Self> {
        let mut item = ItemBuilder::for_item(self.layout, self.index, index)?;
        modify(&mut item)?;
        Ok(self)
    }

    pub fn remove_item(&mut self, index: usize) -> Result<&mut Self> {
        self.update_items(|items| {
            if index >= items.len() {
                return Err(out_of_bounds("item", index, items.len()));
            }
            items.remove(index);
            Ok(())
        })?;
        Ok(self)
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<&mut Self> {
        self.update_items(|items| move_within(items, from, to, "item"))?;
        Ok(self)
    }

    /// Drops items without a widget.
    pub fn remove_empty_items(&mut self) -> &mut Self {
        let items = &self.section().items;
        if items.iter().any(|item| item.widget.is_none()) {
            let kept: Vec<_> = items.iter().filter(|item| item.widget.is_some()).cloned().collect();
            log::debug!("removed {} empty items", items.len() - kept.len());
            self.replace_items(kept);
        }
        self
    }

    pub fn set_section(&mut self, section: DashboardLayoutSection) -> &mut Self {
        self.layout.set_section(self.index, section);
        self
    }

    pub fn facade(&self) -> SectionFacade<'_> {
        SectionFacade::new(&self.layout.layout, self.index)
    }

    fn update_items(
        &mut self,
        update: impl FnOnce(&mut Vec<DashboardLayoutItem>) -> Result<()>,
    ) -> Result<()> {
        let mut items = self.section().items.as_ref().clone();
        update(&mut items)?;
        self.replace_items(items);
        Ok(())
    }

    fn replace_items(&mut self, items: Vec<DashboardLayoutItem>) {
        let section = DashboardLayoutSection {
            header: self.section().header.clone(),
            items: Arc::new(items),
        };
        self.set_section(section);
    }
}

/// Modifies one item of a layout builder.
pub struct ItemBuilder<'a> {
    layout: &'a mut DashboardLayoutBuilder,
    section: usize,
    index: usize,
}

impl<'a> ItemBuilder<'a> {
    /// Fails when the position does not hold an item.
    pub fn for_item(
        layout: &'a mut DashboardLayoutBuilder,
        section: usize,
        index: usize,
    ) -> Result<Self> {
        let sections = &layout.layout.sections;
        let Some(current) = sections.get(section) else {
            return Err(LayoutError::InvalidInput(format!(
                "no section at index {section}"
            )));
        };
        if index >= current.items.len() {
            return Err(LayoutError::InvalidInput(format!(
                "no layout item at section {section}, index {index}"
            )));
        }
        Ok(Self {
            layout,
            section,
            index,
        })
    }

    fn item(&self) -> &DashboardLayoutItem {
        &self.layout.layout.sections[self.section].items[self.index]
    }

    pub fn size(&mut self, update: impl FnOnce(&ItemSizeByScreen) -> ItemSizeByScreen) -> &mut Self {
        let current = self.item();
        let item = DashboardLayoutItem {
            size: update(&current.size),
            widget: current.widget.clone(),
        };
        self.set_item(item)
    }

    pub fn widget(
        &mut self,
        update: impl FnOnce(Option<&LayoutWidget>) -> Option<LayoutWidget>,
    ) -> &mut Self {
        let current = self.item();
        let item = DashboardLayoutItem {
            size: current.size.clone(),
            widget: update(current.widget.as_ref()),
        };
        self.set_item(item)
    }

    pub fn set_item(&mut self, item: DashboardLayoutItem) -> &mut Self {
        let section = &self.layout.layout.sections[self.section];
        let mut items = section.items.as_ref().clone();
        items[self.index] = item;
        let section = DashboardLayoutSection {
            header: section.header.clone(),
            items: Arc::new(items),
        };
        self.layout.set_section(self.section, section);
        self
    }

    /// Read-then-write step: `modify` gets the builder and a facade of the item as it is now.
    pub fn modify(
        &mut self,
        modify: impl FnOnce(&mut Self, &ItemFacade<'_>) -> Result<()>,
    ) -> Result<&mut Self> {
        let snapshot = self.layout.build();
        let facade = ItemFacade::new(SectionFacade::new(&snapshot, self.section), self.index);
        modify(self, &facade)?;
        Ok(self)
    }

    pub fn facade(&self) -> ItemFacade<'_> {
        ItemFacade::new(SectionFacade::new(&self.layout.layout, self.section), self.index)
    }

    pub fn build(&self) -> DashboardLayoutItem {
        self.item().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{InsightWidget, KpiWidget};
    use gooddata_model::id_ref;
    use pretty_assertions::assert_eq;

    fn item(width: u32) -> DashboardLayoutItem {
        DashboardLayoutItem {
            size: ItemSizeByScreen::xl(width),
            widget: Some(LayoutWidget::Insight(InsightWidget {
                identifier: format!("insight{width}"),
                title: "Insight".to_string(),
                insight: id_ref(format!("insight{width}"), None),
            })),
        }
    }

    fn layout() -> DashboardLayout {
        DashboardLayout::new(vec![
            DashboardLayoutSection::new(vec![item(4), item(8)]),
            DashboardLayoutSection::new(vec![item(12)]),
        ])
    }

    #[test]
    fn item_builder_requires_an_item() {
        let mut builder = DashboardLayoutBuilder::for_layout(&layout());
        assert!(matches!(
            ItemBuilder::for_item(&mut builder, 0, 2),
            Err(LayoutError::InvalidInput(_))
        ));
        assert!(matches!(
            ItemBuilder::for_item(&mut builder, 5, 0),
            Err(LayoutError::InvalidInput(_))
        ));
        assert!(builder.modify_section(3, |_| Ok(())).is_err());
    }

    #[test]
    fn section_operations() {
        let original = layout();
        let mut builder = DashboardLayoutBuilder::for_layout(&original);
        builder
            .add_section(DashboardLayoutSection::new(vec![]), Some(0))
            .unwrap()
            .move_section(2, 1)
            .unwrap();
        let moved = builder.build();
        assert!(moved.sections[0].items.is_empty());
        assert_eq!(moved.sections[1].items[0], item(12));

        builder.remove_empty_sections();
        assert_eq!(builder.facade().section_count(), 2);
        builder.remove_section(0).unwrap();
        assert_eq!(builder.build().sections[0].items.len(), 2);

        assert_eq!(original, layout());
    }

    #[test]
    fn item_operations_and_modify() {
        let mut builder = DashboardLayoutBuilder::for_layout(&layout());
        builder
            .modify_section(0, |section| {
                section
                    .header(Some(SectionHeader {
                        title: Some("Sales".to_string()),
                        description: None,
                    }))
                    .move_item(1, 0)?
                    .add_item(
                        DashboardLayoutItem {
                            size: ItemSizeByScreen::xl(2),
                            widget: None,
                        },
                        None,
                    )?;
                section.modify_item(0, |item| {
                    item.modify(|builder, facade| {
                        let width = facade.size().xl.grid_width;
                        builder.size(|size| ItemSizeByScreen {
                            xl: crate::layout::ItemSize {
                                grid_width: width / 2,
                                ..size.xl.clone()
                            },
                            ..size.clone()
                        });
                        Ok(())
                    })?;
                    item.widget(|_| {
                        Some(LayoutWidget::Kpi(KpiWidget {
                            identifier: "kpi".to_string(),
                            title: "KPI".to_string(),
                            measure: id_ref("m.revenue", None),
                        }))
                    });
                    assert!(item.facade().is_kpi_widget_item());
                    Ok(())
                })?;
                assert_eq!(section.facade().item_count(), 3);
                section.remove_empty_items();
                Ok(())
            })
            .unwrap();

        let built = builder.build();
        let section = &built.sections[0];
        assert_eq!(section.header.as_ref().unwrap().title.as_deref(), Some("Sales"));
        assert_eq!(section.items.len(), 2);
        assert_eq!(section.items[0].size.xl.grid_width, 4);
        assert!(matches!(section.items[0].widget, Some(LayoutWidget::Kpi(_))));
        assert_eq!(section.items[1], item(4));
    }
}
