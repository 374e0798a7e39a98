//! Serving the browser client.
//!
//! In production the built client is served from disk and every unknown GET
//! falls back to `index.html` so client-side routes survive a reload. In
//! development the client runs on its own dev server and `/` just points there.

use std::path::PathBuf;

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{web, HttpResponse};

#[derive(Debug, Clone)]
pub enum Frontend {
    /// Directory holding the built client (`index.html` + assets).
    Static(PathBuf),
    /// URL of the client's dev server.
    DevRedirect(String),
}

/// Must be registered after [`crate::configure_routes`]: the static service
/// is mounted at `/` and would otherwise shadow the API.
pub fn configure_frontend(cfg: &mut web::ServiceConfig, frontend: &Frontend) {
    match frontend {
        Frontend::Static(dir) => {
            let index = dir.join("index.html");
            cfg.service(
                Files::new("/", dir)
                    .index_file("index.html")
                    .use_etag(true)
                    .default_handler(fn_service(move |req: ServiceRequest| {
                        let index = index.clone();
                        async move {
                            let (req, _) = req.into_parts();
                            let file = NamedFile::open_async(&index).await?;
                            let res = file.into_response(&req);
                            Ok(ServiceResponse::new(req, res))
                        }
                    })),
            );
        }
        Frontend::DevRedirect(target) => {
            let target = target.clone();
            cfg.route(
                "/",
                web::get().to(move || {
                    let target = target.clone();
                    async move {
                        HttpResponse::TemporaryRedirect()
                            .insert_header((header::LOCATION, target))
                            .finish()
                    }
                }),
            );
        }
    }
}
