//! Catalog gallery: one card per product, plus a banner when loading failed.

use std::sync::Arc;

use parking_lot::Mutex;
use storefront_core::{CatalogState, EventFilter, EventKind, Product, StoreEvent};

use super::{Control, Element, Presenter, View};
use crate::state::ConfigState;
use crate::surface::{Slot, Surface};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryModel {
    pub products: Vec<Product>,
    /// Set while the last catalog load failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GalleryView {
    config: ConfigState,
}

impl GalleryView {
    pub fn new(config: ConfigState) -> Self {
        GalleryView { config }
    }
}

impl View for GalleryView {
    type Model = GalleryModel;

    fn render(&self, model: &GalleryModel) -> Element {
        let mut element = Element::titled("Catalog");
        if let Some(error) = &model.error {
            element.push_line(format!("! Catalog unavailable: {}", error));
        }
        if model.products.is_empty() && model.error.is_none() {
            element.push_line("Loading...");
        }
        for (i, product) in model.products.iter().enumerate() {
            let label = format!(
                "{} [{}] {}",
                product.title,
                product.category,
                self.config.format_price(product.price)
            );
            element.push_control(Control::button(
                format!("p{}", i + 1),
                label,
                StoreEvent::ProductSelected(product.clone()),
            ));
        }
        element
    }
}

pub struct GalleryPresenter {
    catalog: Arc<CatalogState>,
    surface: Arc<Surface>,
    view: GalleryView,
    error: Mutex<Option<String>>,
}

impl GalleryPresenter {
    pub fn new(catalog: Arc<CatalogState>, surface: Arc<Surface>, view: GalleryView) -> Self {
        GalleryPresenter {
            catalog,
            surface,
            view,
            error: Mutex::new(None),
        }
    }
}

impl Presenter for GalleryPresenter {
    fn triggers(&self) -> EventFilter {
        EventFilter::Kinds(vec![EventKind::CatalogChanged, EventKind::CatalogFetchFailed])
    }

    fn refresh(&self, event: Option<&StoreEvent>) -> anyhow::Result<()> {
        match event {
            Some(StoreEvent::CatalogFetchFailed { message }) => {
                *self.error.lock() = Some(message.clone());
            }
            Some(StoreEvent::CatalogChanged(_)) => *self.error.lock() = None,
            _ => {}
        }

        let model = GalleryModel {
            products: self.catalog.get_products(),
            error: self.error.lock().clone(),
        };
        self.surface.set(Slot::Gallery, self.view.render(&model));
        Ok(())
    }
}
