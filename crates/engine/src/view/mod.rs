//! View adapters for the product screens.
//!
//! A view subscribes to the engine's derived streams and the error
//! notifications, reconciles them into a single view-model, and forwards user
//! actions back to the engine. The view-models are plain serializable values;
//! drawing them is left to a [`Render`] implementation.

mod detail;
mod list;

pub use detail::{ProductDetailView, ProductDetailViewModel};
pub use list::{PRODUCT_LIST_TITLE, ProductListView, ProductListViewModel};

use catalog_streams::ReplayStream;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

/// Draws view-models.
///
/// Any `FnMut(&VM)` closure is a renderer.
pub trait Render<VM>: Send + 'static {
    fn render(&mut self, view_model: &VM);
}

impl<VM, F> Render<VM> for F
where
    F: FnMut(&VM) + Send + 'static,
{
    fn render(&mut self, view_model: &VM) {
        self(view_model)
    }
}

/// Render every view-model published on `view_models` until the view goes away.
fn drive<VM, R>(mut view_models: ReplayStream<VM>, mut renderer: R) -> JoinHandle<()>
where
    VM: Clone + Send + Sync + 'static,
    R: Render<VM>,
{
    tokio::spawn(async move {
        while let Some(view_model) = view_models.next().await {
            renderer.render(&view_model);
        }
    })
}
