//! `gooddata-dashboard` holds the dashboard layout tree.
//!
//! A layout is a list of sections, each a list of sized items holding a widget (KPI, insight,
//! custom widget or a nested layout). Layouts are read through the position-aware facades and
//! changed only through [`DashboardLayoutBuilder`] or [`with_item_change`], which share every
//! part of the tree they do not touch.

mod builder;
mod error;
mod facade;
mod layout;
mod path;

pub use builder::{DashboardLayoutBuilder, ItemBuilder, SectionBuilder};
pub use error::{LayoutError, Result};
pub use facade::{DashboardLayoutFacade, ItemFacade, SectionFacade};
pub use layout::{
    CustomWidget, DashboardLayout, DashboardLayoutItem, DashboardLayoutSection, InsightWidget,
    ItemSize, ItemSizeByScreen, KpiWidget, LayoutWidget, SectionHeader,
};
pub use path::{layout_item_at, with_item_change, LayoutCoordinates, LayoutPath};
