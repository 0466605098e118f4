//! Page state and its transitions.
//!
//! A page view is `ViewState` plus the catalog snapshot it was built from.
//! User actions arrive as [`ViewEvent`]s; [`ViewState::apply`] performs the
//! transition and the caller re-renders.

use crate::filter::{build_filters, filtered_view, ActiveFilter, FilterButton};
use crate::product::{Product, ProductId};

/// How the detail modal was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseControl,
    Backdrop,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A filter button was selected, by id.
    SelectFilter(String),
    OpenProduct(ProductId),
    CloseModal(CloseTrigger),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    active_filter: ActiveFilter,
    selected: Option<ProductId>,
    scroll_locked: bool,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `event` against `catalog`. Returns `true` if the state changed.
    ///
    /// Selecting an id that has no filter button resets to "all", so exactly
    /// one button stays active. Opening an unknown product is ignored.
    pub fn apply(&mut self, catalog: &[Product], event: ViewEvent) -> bool {
        let before = self.clone();
        match event {
            ViewEvent::SelectFilter(id) => {
                let requested = ActiveFilter::from_id(&id);
                let offered = build_filters(catalog, &requested)
                    .iter()
                    .any(|button| button.active);
                if offered {
                    self.active_filter = requested;
                } else {
                    tracing::debug!(filter = %id, "filter not offered for this catalog; showing all");
                    self.active_filter = ActiveFilter::All;
                }
            }
            ViewEvent::OpenProduct(id) => {
                if catalog.iter().any(|p| p.id.as_ref() == Some(&id)) {
                    self.selected = Some(id);
                    self.scroll_locked = true;
                } else {
                    tracing::debug!(product_id = %id, "ignoring open for unknown product");
                }
            }
            ViewEvent::CloseModal(trigger) => {
                if self.selected.is_some() {
                    tracing::trace!(?trigger, "closing product modal");
                }
                self.selected = None;
                self.scroll_locked = false;
            }
        }
        *self != before
    }

    #[must_use]
    pub fn active_filter(&self) -> &ActiveFilter {
        &self.active_filter
    }

    /// `true` while the modal is open and page scrolling is suspended.
    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    #[must_use]
    pub fn selected_product<'a>(&self, catalog: &'a [Product]) -> Option<&'a Product> {
        let id = self.selected.as_ref()?;
        catalog.iter().find(|p| p.id.as_ref() == Some(id))
    }

    #[must_use]
    pub fn visible_products<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        filtered_view(catalog, &self.active_filter)
    }

    #[must_use]
    pub fn filter_buttons(&self, catalog: &[Product]) -> Vec<FilterButton> {
        build_filters(catalog, &self.active_filter)
    }
}
