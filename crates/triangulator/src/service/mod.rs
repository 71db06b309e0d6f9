//! Request boundary around the triangulation core.
//!
//! Purpose
//! - `GET /triangulation/{id}`: fetch the point set from a `PointSetSource`,
//!   decode it, triangulate, encode the result.
//! - Failures are an explicit `ServiceError` tag; `ServiceError::status` is the
//!   only place that knows transport status codes. Nothing escapes `handle`.
//!
//! Transport is left to the embedder: `handle` returns a `Response` value
//! (status, content type, body) ready to be written out.

mod cfg;
mod id;
mod source;

pub use cfg::{
    parse_timeout_ms, ConfigError, ServiceCfg, DEFAULT_STORE, ENV_COMPUTE_TIMEOUT_MS, ENV_STORE,
};
pub use id::{IdParseError, PointSetId};
pub use source::{DirSource, FetchError, MemorySource, PointSetSource};

use std::sync::mpsc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::codec::{decode_point_set, encode_triangulation, CodecError};
use crate::geometry::Point;
use crate::triangulate::{compute_triangulation, Triangulation};

pub const CONTENT_TYPE_BINARY: &str = "application/octet-stream";
pub const CONTENT_TYPE_JSON: &str = "application/json";

const ROUTE_PREFIX: &str = "/triangulation/";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("point set {id} not found")]
    PointsetNotFound { id: String },
    #[error("point-set store error (status {status}): {reason}")]
    ManagerError { status: u16, reason: String },
    #[error("point-set store unavailable: {0}")]
    ManagerUnavailable(String),
    #[error("invalid point-set data: {0}")]
    InvalidBinaryData(#[from] CodecError),
    #[error("internal error: {0}")]
    InternalError(String),
    /// Unknown route, or an id that is not a UUID.
    #[error("no resource at {path}")]
    NotFound { path: String },
    #[error("method {method} not allowed")]
    MethodNotAllowed { method: String },
}

impl From<FetchError> for ServiceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(id) => ServiceError::PointsetNotFound { id: id.to_string() },
            FetchError::Status { status, reason } => ServiceError::ManagerError { status, reason },
            FetchError::Unavailable(reason) => ServiceError::ManagerUnavailable(reason),
        }
    }
}

impl ServiceError {
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::PointsetNotFound { .. } | ServiceError::NotFound { .. } => 404,
            ServiceError::MethodNotAllowed { .. } => 405,
            ServiceError::ManagerError { .. } | ServiceError::ManagerUnavailable(_) => 503,
            ServiceError::InvalidBinaryData(_) | ServiceError::InternalError(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::PointsetNotFound { .. } => "POINTSET_NOT_FOUND",
            ServiceError::ManagerError { .. } => "MANAGER_ERROR",
            ServiceError::ManagerUnavailable(_) => "MANAGER_UNAVAILABLE",
            ServiceError::InvalidBinaryData(_) => "INVALID_BINARY_DATA",
            ServiceError::InternalError(_) => "INTERNAL_ERROR",
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// JSON error payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// What a transport writes back.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_BINARY,
            body,
        }
    }

    pub fn error(err: &ServiceError) -> Self {
        let body = serde_json::to_vec(&err.body()).unwrap_or_else(|_| b"{}".to_vec());
        Self {
            status: err.status(),
            content_type: CONTENT_TYPE_JSON,
            body,
        }
    }
}

impl From<Result<Vec<u8>, ServiceError>> for Response {
    fn from(res: Result<Vec<u8>, ServiceError>) -> Self {
        match res {
            Ok(bytes) => Response::ok(bytes),
            Err(e) => Response::error(&e),
        }
    }
}

/// The triangulation service: a point-set source plus its configuration.
pub struct Triangulator<S> {
    source: S,
    cfg: ServiceCfg,
}

impl Triangulator<DirSource> {
    /// Directory-backed service rooted at `cfg.store_root`.
    pub fn from_cfg(cfg: ServiceCfg) -> Self {
        let source = DirSource::new(cfg.store_root.clone());
        Self { source, cfg }
    }
}

impl<S: PointSetSource> Triangulator<S> {
    pub fn new(source: S, cfg: ServiceCfg) -> Self {
        Self { source, cfg }
    }

    pub fn cfg(&self) -> &ServiceCfg {
        &self.cfg
    }

    /// Route one request. Never fails; errors become JSON responses.
    pub fn handle(&self, method: &str, path: &str) -> Response {
        let res = self.route(method, path);
        match &res {
            Ok(body) => tracing::info!(method, path, status = 200, bytes = body.len(), "request"),
            Err(e) => tracing::warn!(method, path, status = e.status(), code = e.code(), error = %e, "request"),
        }
        res.into()
    }

    fn route(&self, method: &str, path: &str) -> Result<Vec<u8>, ServiceError> {
        let raw_id = path
            .strip_prefix(ROUTE_PREFIX)
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .ok_or_else(|| ServiceError::NotFound {
                path: path.to_string(),
            })?;
        if !method.eq_ignore_ascii_case("GET") {
            return Err(ServiceError::MethodNotAllowed {
                method: method.to_string(),
            });
        }
        self.get_triangulation(raw_id)
    }

    /// Fetch, decode, triangulate and encode point set `raw_id`.
    pub fn get_triangulation(&self, raw_id: &str) -> Result<Vec<u8>, ServiceError> {
        let id: PointSetId = raw_id.parse().map_err(|e: IdParseError| {
            tracing::debug!(error = %e, "rejecting id");
            ServiceError::NotFound {
                path: format!("{ROUTE_PREFIX}{raw_id}"),
            }
        })?;
        let bytes = self.source.fetch(&id)?;
        let points = decode_point_set(&bytes)?;
        tracing::debug!(%id, points = points.len(), "decoded point set");
        let tri = self.run_core(points)?;
        tracing::debug!(
            %id,
            vertices = tri.vertices.len(),
            triangles = tri.triangles.len(),
            complete = tri.is_complete(),
            "triangulated"
        );
        encode_triangulation(&tri.vertices, &tri.triangles)
            .map_err(|e| ServiceError::InternalError(format!("encoding result: {e}")))
    }

    fn run_core(&self, points: Vec<Point>) -> Result<Triangulation, ServiceError> {
        match self.cfg.compute_timeout {
            None => Ok(compute_triangulation(&points)),
            Some(limit) => triangulate_with_deadline(points, limit),
        }
    }
}

/// Run the core on a detached worker; a missed deadline or a worker panic is an internal error.
pub fn triangulate_with_deadline(
    points: Vec<Point>,
    limit: Duration,
) -> Result<Triangulation, ServiceError> {
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("triangulate".into())
        .spawn(move || {
            // The receiver may have given up already.
            let _ = tx.send(compute_triangulation(&points));
        })
        .map_err(|e| ServiceError::InternalError(format!("spawning worker: {e}")))?;
    match rx.recv_timeout(limit) {
        Ok(tri) => Ok(tri),
        Err(mpsc::RecvTimeoutError::Timeout) => Err(ServiceError::InternalError(format!(
            "triangulation exceeded {} ms",
            limit.as_millis()
        ))),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(ServiceError::InternalError(
            "triangulation worker stopped without a result".to_string(),
        )),
    }
}
