use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use catalog_core::ProductId;
use catalog_products::Product;
use catalog_streams::{NotificationStream, Replay, ReplayStream};

use super::{Render, drive};
use crate::engine::{ProductActions, ProductEngine};

pub const PRODUCT_LIST_TITLE: &str = "Products";

/// Everything the product list screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListViewModel {
    pub page_title: String,
    pub products: Vec<Product>,
    pub selected_product_id: Option<ProductId>,
    pub error_message: Option<String>,
}

#[derive(Debug, Default)]
struct ListState {
    products: Option<Vec<Product>>,
    selected_product_id: Option<ProductId>,
    error_message: Option<String>,
}

impl ListState {
    fn view_model(&self) -> Option<ProductListViewModel> {
        let products = self.products.as_ref()?;
        Some(ProductListViewModel {
            page_title: PRODUCT_LIST_TITLE.to_string(),
            products: products.clone(),
            selected_product_id: self.selected_product_id,
            error_message: self.error_message.clone(),
        })
    }
}

/// Product list screen adapter.
///
/// A view-model is published once the enriched product list is known, and
/// again on every change of the list or the selected product. Error
/// notifications are read from a session opened on attach, so only failures
/// raised while the view exists are shown.
#[derive(Debug)]
pub struct ProductListView {
    actions: ProductActions,
    view_models: Replay<ProductListViewModel>,
    task: JoinHandle<()>,
}

impl ProductListView {
    pub fn attach(engine: &ProductEngine) -> Self {
        let view_models = Replay::new();
        let task = spawn_list_model(
            engine.products_with_categories(),
            engine.selected_product(),
            engine.errors(),
            view_models.clone(),
        );

        Self {
            actions: engine.actions(),
            view_models,
            task,
        }
    }

    pub fn view_models(&self) -> ReplayStream<ProductListViewModel> {
        self.view_models.subscribe()
    }

    pub fn latest(&self) -> Option<ProductListViewModel> {
        self.view_models.latest()
    }

    /// Render every view-model, starting with the current one.
    pub fn run<R: Render<ProductListViewModel>>(&self, renderer: R) -> JoinHandle<()> {
        drive(self.view_models(), renderer)
    }

    /// The user picked a product in the list.
    pub fn on_selected(&self, id: ProductId) {
        self.actions.selected_product_change(id);
    }

    /// The user pressed "add product".
    pub fn on_add(&self) {
        self.actions.add_product(None);
    }
}

impl Drop for ProductListView {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spawn_list_model(
    mut products: ReplayStream<Vec<Product>>,
    mut selected: ReplayStream<Option<Product>>,
    mut errors: NotificationStream,
    out: Replay<ProductListViewModel>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut state = ListState::default();
        loop {
            tokio::select! {
                Some(list) = products.next() => state.products = Some(list),
                Some(product) = selected.next() => {
                    state.selected_product_id = product.map(|p| p.id);
                }
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
