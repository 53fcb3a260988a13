//! Release index server test utilities

use mockito::{Mock, Server};

use chromium_update_notifier::config::{Architecture, FetchConfig};
use chromium_update_notifier::version::sources::ReleaseIndexSource;

/// Render a release index page listing the given versions
pub fn release_index_html(versions: &[&str]) -> String {
    let items: String = versions
        .iter()
        .map(|v| format!("      <li><a href=\"./{v}\">{v}</a></li>\n"))
        .collect();

    format!(
        "<!DOCTYPE html>\n<html>\n  <body>\n    <h1>Windows 64-bit</h1>\n    <ul>\n{items}    </ul>\n  </body>\n</html>\n"
    )
}

/// Serve `body` with `status` on the release page of `architecture`
pub async fn mock_release_index(
    server: &mut Server,
    architecture: Architecture,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", architecture.release_path())
        .with_status(status)
        .with_header("content-type", "text/html")
        .with_body(body)
        .create_async()
        .await
}

/// HTTP page source pointed at the mock server
pub fn source_for(server: &Server) -> ReleaseIndexSource {
    ReleaseIndexSource::new(&FetchConfig {
        base_url: server.url(),
        ..Default::default()
    })
    .unwrap()
}
