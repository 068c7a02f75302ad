use std::path::Path;

use devserve::config::Config;
use devserve::server::banner;

#[test]
fn test_banner_lists_url_root_and_pages() {
    let cfg = Config::default();
    let text = banner::render(&cfg, Path::new("/srv/app/public"), 3500).unwrap();

    assert!(text.starts_with("Server running at http://localhost:3500/\n"));
    assert!(text.contains("Serving files from: /srv/app/public"));
    assert!(text.contains("  - http://localhost:3500/\n"));
    for page in [
        "login.html",
        "master-dashboard.html",
        "campaign-detail.html",
        "login-debug.html",
        "test-api.html",
    ] {
        assert!(text.contains(&format!("  - http://localhost:3500/{page}")), "{page}");
    }
    assert!(text.ends_with("Press Ctrl+C to stop the server"));
}

#[test]
fn test_banner_reflects_modes() {
    let cfg = Config {
        enable_cors: true,
        enable_spa_fallback: false,
        example_pages: vec!["/about.html".to_string()],
        ..Config::default()
    };
    let text = banner::render(&cfg, Path::new("/tmp/site"), 8080).unwrap();

    assert!(text.contains("CORS headers enabled"));
    assert!(!text.contains("fall back"));
    assert!(text.contains("  - http://localhost:8080/about.html"));
}
