use lims_core::{ClientSettings, Lims};

/// Username every mocked client authenticates with.
pub const TEST_USERNAME: &str = "apiuser";
/// Password every mocked client authenticates with.
pub const TEST_PASSWORD: &str = "secret";

/// Helper for testing the LIMS SDK using wiremock.
///
/// Returns a client whose base URI points at the mock server. Warning: when
/// using `Mock::expect` ensure `server` is not dropped before the test
/// completes.
pub async fn start_lims_mock(mocks: Vec<wiremock::Mock>) -> (wiremock::MockServer, Lims) {
    let server = wiremock::MockServer::start().await;

    for mock in mocks {
        server.register(mock).await;
    }

    let lims = Lims::new(ClientSettings::new(
        server.uri(),
        TEST_USERNAME,
        TEST_PASSWORD,
    ));

    (server, lims)
}
