mod context;
pub use context::{AuthenticatedUser, RequestContext};

mod error;
pub use error::{ErrorResponse, WebError, WebResult};

mod extract;
pub use extract::{JsonBody, QueryParams};

pub mod dto;

pub mod middlewares;

mod state;
pub use state::AppState;

pub mod routes;

pub mod doc;
