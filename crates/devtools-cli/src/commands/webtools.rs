//! `devtools webtools serve`: the environment report over HTTP.
//!
//! | Route             | Body                |
//! |-------------------|---------------------|
//! | `GET /`, `/info`  | report as HTML      |
//! | `GET /info.json`  | report as JSON      |
//! | anything else     | 404 error page      |

use std::convert::Infallible;
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tracing::{debug, info, instrument, warn};

use devtools_core::{VERSION, domain::InfoReport, error::ErrorInfo};

use crate::{
    cli::WebtoolsCommands,
    commands::{info::build_report, project_root},
    error::{CliError, CliResult},
    output::OutputManager,
    settings::AppSettings,
};

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";

#[instrument(skip_all)]
pub fn execute(
    cmd: WebtoolsCommands,
    settings: AppSettings,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        WebtoolsCommands::Serve { addr, directory } => {
            let addr = addr.unwrap_or_else(|| settings.webtools.addr.clone());
            let address: SocketAddr = addr.parse().map_err(|e| CliError::InvalidInput {
                message: format!("'{addr}' is not a HOST:PORT address ({e})"),
            })?;
            let root = project_root(directory.as_deref())?;
            let report = Arc::new(build_report(&root, &settings));
            serve(address, report, &output)
        }
    }
}

fn serve(address: SocketAddr, report: Arc<InfoReport>, output: &OutputManager) -> CliResult<()> {
    let server_error = |message: String| CliError::ServerError {
        addr: address.to_string(),
        message,
    };
    let rt = tokio::runtime::Runtime::new().map_err(|e| server_error(e.to_string()))?;

    rt.block_on(async {
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| server_error(e.to_string()))?;
        output.success(&format!("Webtools listening on http://{address}/"))?;
        output.info("Press Ctrl-C to stop")?;

        loop {
            let connection: std::io::Result<(TcpStream, SocketAddr)> = select! {
                _ = tokio::signal::ctrl_c() => break,
                r = listener.accept() => r,
            };
            let (stream, peer) = match connection {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    continue;
                }
            };
            debug!(%peer, "Connection accepted");

            let io = TokioIo::new(stream);
            let report = report.clone();
            tokio::spawn(async move {
                let served = http1::Builder::new()
                    .serve_connection(io, service_fn(move |req| handle(req, report.clone())))
                    .await;
                if let Err(e) = served {
                    debug!(%peer, error = %e, "Connection closed with error");
                }
            });
        }

        info!("Shutting down webtools server");
        Ok::<_, CliError>(())
    })?;

    rt.shutdown_background();
    output.print("Webtools stopped")?;
    Ok(())
}

async fn handle(
    req: Request<hyper::body::Incoming>,
    report: Arc<InfoReport>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (status, content_type, body) = route(req.method(), req.uri().path(), &report);
    debug!(method = %req.method(), path = %req.uri().path(), %status, "Request");

    let mut res = Response::new(Full::new(Bytes::from(body)));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    Ok(res)
}

/// Status, content type and body for one request.
fn route(method: &Method, path: &str, report: &InfoReport) -> (StatusCode, &'static str, String) {
    if method != Method::GET && method != Method::HEAD {
        let info = ErrorInfo::new(format!("Method {method} is not allowed")).with_code(405);
        return (StatusCode::METHOD_NOT_ALLOWED, HTML, error_page(&info));
    }

    match path.trim_end_matches('/') {
        "" | "/info" => (StatusCode::OK, HTML, info_page(report)),
        "/info.json" => match serde_json::to_string_pretty(report) {
            Ok(json) => (StatusCode::OK, JSON, json),
            Err(e) => {
                let info = ErrorInfo::new(e.to_string()).with_code(500);
                (StatusCode::INTERNAL_SERVER_ERROR, HTML, error_page(&info))
            }
        },
        other => {
            let info = ErrorInfo::new(format!("Page '{other}' was not found")).with_code(404);
            (StatusCode::NOT_FOUND, HTML, error_page(&info))
        }
    }
}

fn info_page(report: &InfoReport) -> String {
    let mut body = String::new();
    for section in report.sections.iter().filter(|s| !s.entries.is_empty()) {
        let _ = writeln!(body, "<h2>{}</h2>\n<table>", escape(section.title));
        for entry in &section.entries {
            let _ = writeln!(
                body,
                "<tr><th>{}</th><td>{}</td></tr>",
                escape(&entry.key),
                escape(&entry.value)
            );
        }
        body.push_str("</table>\n");
    }
    layout("Information", &body)
}

fn error_page(info: &ErrorInfo) -> String {
    let mut body = format!(
        "<h2>Error {}</h2>\n<p>{}</p>\n",
        info.code(),
        escape(info.message())
    );
    if !info.file().is_empty() {
        let line = info.line().map(|l| format!(":{l}")).unwrap_or_default();
        let _ = writeln!(body, "<p><code>{}{}</code></p>", escape(info.file()), line);
    }
    body.push_str("<p><a href=\"/\">Back to the report</a></p>\n");
    layout("Error", &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - Phalcon Web Tools</title>\n\
         <style>body{{font-family:sans-serif;margin:2em}}th{{text-align:left;padding-right:2em}}</style>\n\
         </head>\n<body>\n<h1>Phalcon Web Tools</h1>\n{body}\
         <footer><small>Phalcon Developer Tools {VERSION}</small></footer>\n</body>\n</html>\n"
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
