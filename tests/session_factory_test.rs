// Smoke test for browser session launch and cookie plumbing.
// Requires chromedriver and Chrome on PATH, so it does not run by default:
//   cargo test --test session_factory_test -- --ignored

use linkpilot::{BrowserOptions, SessionFactory};

#[tokio::test]
#[ignore] // needs a local chromedriver installation
async fn test_launch_navigate_close() {
    let factory = SessionFactory::new(BrowserOptions::new(true));
    let browser = factory.create().await.expect("launch failed");

    browser.goto("https://example.com/").await.expect("goto failed");
    let url = browser.current_url().await.expect("current_url failed");
    assert!(url.starts_with("https://example.com"));

    // No session cookie on a site we never logged into
    assert!(browser.session_cookie("li_at").await.is_none());

    browser.close().await.expect("close failed");
}
