//! Read-only, position-aware views over a layout tree.

use crate::layout::{
    CustomWidget, DashboardLayout, DashboardLayoutItem, DashboardLayoutSection, InsightWidget,
    ItemSizeByScreen, KpiWidget, LayoutWidget, SectionHeader,
};

#[derive(Clone, Copy, Debug)]
pub struct DashboardLayoutFacade<'a> {
    layout: &'a DashboardLayout,
}

impl<'a> DashboardLayoutFacade<'a> {
    pub fn for_layout(layout: &'a DashboardLayout) -> Self {
        Self { layout }
    }

    pub fn raw(&self) -> &'a DashboardLayout {
        self.layout
    }

    pub fn size(&self) -> Option<&'a ItemSizeByScreen> {
        self.layout.size.as_ref()
    }

    pub fn section_count(&self) -> usize {
        self.layout.sections.len()
    }

    pub fn section(&self, index: usize) -> Option<SectionFacade<'a>> {
        let section = self.layout.sections.get(index)?;
        Some(SectionFacade {
            layout: self.layout,
            section,
            index,
        })
    }

    pub fn sections(&self) -> impl Iterator<Item = SectionFacade<'a>> + 'a {
        let layout = self.layout;
        let sections: &'a [DashboardLayoutSection] = &layout.sections;
        sections
            .iter()
            .enumerate()
            .map(move |(index, section)| SectionFacade {
                layout,
                section,
                index,
            })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SectionFacade<'a> {
    layout: &'a DashboardLayout,
    section: &'a DashboardLayoutSection,
    index: usize,
}

impl<'a> SectionFacade<'a> {
    /// Panics when `index` is out of bounds; callers check positions up front.
    pub(crate) fn new(layout: &'a DashboardLayout, index: usize) -> Self {
        Self {
            layout,
            section: &layout.sections[index],
            index,
        }
    }

    pub fn raw(&self) -> &'a DashboardLayoutSection {
        self.section
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.layout.sections.len()
    }

    pub fn header(&self) -> Option<&'a SectionHeader> {
        self.section.header.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.section.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.section.items.len()
    }

    pub fn item(&self, index: usize) -> Option<ItemFacade<'a>> {
        let item = self.section.items.get(index)?;
        Some(ItemFacade {
            section: *self,
            item,
            index,
        })
    }

    pub fn items(&self) -> impl Iterator<Item = ItemFacade<'a>> + 'a {
        let section = *self;
        let items: &'a [DashboardLayoutItem] = &self.section.items;
        items
            .iter()
            .enumerate()
            .map(move |(index, item)| ItemFacade {
                section,
                item,
                index,
            })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ItemFacade<'a> {
    section: SectionFacade<'a>,
    item: &'a DashboardLayoutItem,
    index: usize,
}

impl<'a> ItemFacade<'a> {
    pub(crate) fn new(section: SectionFacade<'a>, index: usize) -> Self {
        Self {
            section,
            item: &section.section.items[index],
            index,
        }
    }

    pub fn raw(&self) -> &'a DashboardLayoutItem {
        self.item
    }

    pub fn section(&self) -> SectionFacade<'a> {
        self.section
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.section.item_count()
    }

    pub fn size(&self) -> &'a ItemSizeByScreen {
        &self.item.size
    }

    pub fn widget(&self) -> Option<&'a LayoutWidget> {
        self.item.widget.as_ref()
    }

    /// Item without a widget.
    pub fn is_empty(&self) -> bool {
        self.item.widget.is_none()
    }

    pub fn is_insight_widget_item(&self) -> bool {
        self.insight_widget().is_some()
    }

    pub fn is_kpi_widget_item(&self) -> bool {
        self.kpi_widget().is_some()
    }

    pub fn is_layout_item(&self) -> bool {
        self.layout().is_some()
    }

    pub fn is_custom_widget_item(&self) -> bool {
        self.custom_widget().is_some()
    }

    pub fn insight_widget(&self) -> Option<&'a InsightWidget> {
        match self.widget()? {
            LayoutWidget::Insight(widget) => Some(widget),
            _ => None,
        }
    }

    pub fn kpi_widget(&self) -> Option<&'a KpiWidget> {
        match self.widget()? {
            LayoutWidget::Kpi(widget) => Some(widget),
            _ => None,
        }
    }

    /// Nested layout held by the item.
    pub fn layout(&self) -> Option<&'a DashboardLayout> {
        match self.widget()? {
            LayoutWidget::Layout(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn custom_widget(&self) -> Option<&'a CustomWidget> {
        match self.widget()? {
            LayoutWidget::Custom(widget) => Some(widget),
            _ => None,
        }
    }
}
