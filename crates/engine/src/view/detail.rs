use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use catalog_products::{Product, Supplier};
use catalog_streams::{NotificationStream, Replay, ReplayStream};

use super::{Render, drive};
use crate::engine::ProductEngine;

/// Everything the product detail screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailViewModel {
    pub product: Product,
    pub product_suppliers: Vec<Supplier>,
    pub page_title: String,
    pub error_message: Option<String>,
}

fn detail_title(product: &Product) -> String {
    format!("Product Detail for : {}", product.product_name)
}

#[derive(Debug, Default)]
struct DetailState {
    product: Option<Product>,
    suppliers: Option<Vec<Supplier>>,
    error_message: Option<String>,
}

impl DetailState {
    // No product selected means nothing to show, not an empty screen.
    fn view_model(&self) -> Option<ProductDetailViewModel> {
        let product = self.product.as_ref()?;
        let suppliers = self.suppliers.as_ref()?;
        Some(ProductDetailViewModel {
            product: product.clone(),
            product_suppliers: suppliers.clone(),
            page_title: detail_title(product),
            error_message: self.error_message.clone(),
        })
    }
}

/// Product detail screen adapter: the selected product and its suppliers.
#[derive(Debug)]
pub struct ProductDetailView {
    view_models: Replay<ProductDetailViewModel>,
    task: JoinHandle<()>,
}

impl ProductDetailView {
    pub fn attach(engine: &ProductEngine) -> Self {
        let view_models = Replay::new();
        let task = spawn_detail_model(
            engine.selected_product(),
            engine.selected_product_suppliers(),
            engine.errors(),
            view_models.clone(),
        );
        Self { view_models, task }
    }

    pub fn view_models(&self) -> ReplayStream<ProductDetailViewModel> {
        self.view_models.subscribe()
    }

    pub fn latest(&self) -> Option<ProductDetailViewModel> {
        self.view_models.latest()
    }

    pub fn run<R: Render<ProductDetailViewModel>>(&self, renderer: R) -> JoinHandle<()> {
        drive(self.view_models(), renderer)
    }
}

impl Drop for ProductDetailView {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spawn_detail_model(
    mut selected: ReplayStream<Option<Product>>,
    mut suppliers: ReplayStream<Vec<Supplier>>,
    mut errors: NotificationStream,
    out: Replay<ProductDetailViewModel>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut state = DetailState::default();
        loop {
            tokio::select! {
                Some(product) = selected.next() => state.product = product,
                Some(list) = suppliers.next() => state.suppliers = Some(list),
                Some(notification) = errors.recv() => {
                    state.error_message = Some(notification.message);
                }
                else => break,
            }

            if let Some(view_model) = state.view_model() {
                out.publish(view_model);
            }
        }
    })
}
