pub mod events;
pub mod export;
pub mod headers;
pub mod images;
pub mod params;
pub mod preview;
pub mod quantize;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::services::{PendingRender, RenderEvent};

pub use events::{handle_events, __path_handle_events};
pub use export::{handle_export_composite, handle_export_original};
pub use export::{__path_handle_export_composite, __path_handle_export_original};
pub use images::{handle_list, handle_remove_all, handle_select, handle_upload};
pub use images::{__path_handle_list, __path_handle_remove_all, __path_handle_select};
pub use images::{
    ImageListResponse, IngestResponse, RemoveAllResponse, SelectRequest, SelectResponse,
    __path_handle_upload,
};
pub use params::{handle_get_params, handle_refresh, handle_update_params};
pub use params::{ParamsPatch, ParamsResponse, RefreshResponse};
pub use params::{__path_handle_get_params, __path_handle_refresh, __path_handle_update_params};
pub use preview::{handle_preview, handle_status, __path_handle_preview, __path_handle_status};
pub use quantize::{handle_quantize, handle_quantize_batch};
pub use quantize::{__path_handle_quantize, __path_handle_quantize_batch};

/// Query flag for mutating endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WaitQuery {
    /// Wait for the scheduled render and include its outcome in the response
    #[serde(default)]
    pub wait: bool,
}

/// Await `render` when the client asked to wait; otherwise let it run detached.
async fn settle(render: Option<PendingRender>, wait: bool) -> Option<RenderEvent> {
    match render {
        Some(render) if wait => Some(render.wait().await),
        _ => None,
    }
}
