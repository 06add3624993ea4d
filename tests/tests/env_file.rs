mod utils;
#[allow(unused)]
use utils::*;

use clap::Parser;
use volley_runtime::{runtime::load_env_file, VolleyCli, VolleyRuntime};

#[tokio::test]
async fn runs_from_env_file() -> anyhow::Result<()> {
    let mock = init().await;
    let url = mock.url("/status/202");

    let dir = std::env::temp_dir().join(format!("volley-env-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(".env");
    std::fs::write(
        &path,
        format!(
            "TOTAL_REQUESTS=5\n\
             CONCURRENT_REQUESTS=2\n\
             REQUESTS_PER_SECOND=100\n\
             API_URL={url}\n\
             JSON_BODY='{{\"from\": \"env\"}}'\n\
             X_CLIENT_ID=env-file\n"
        ),
    )?;

    // Already exported variables win over the file.
    std::env::set_var("CONCURRENT_REQUESTS", "1");
    assert_eq!(load_env_file(Some(&path))?, Some(path.clone()));
    std::fs::remove_dir_all(&dir)?;

    // And the command line wins over both.
    let cli = VolleyCli::try_parse_from(["volley", "--total-requests", "3"])?;
    let config = cli.run_config()?;
    assert_eq!(config.total_requests.get(), 3);
    assert_eq!(config.max_concurrent.get(), 1);
    assert_eq!(config.request.body, serde_json::json!({ "from": "env" }));
    assert_eq!(
        config.request.headers,
        vec![("X-Client-Id".to_string(), "env-file".to_string())]
    );

    let summary = VolleyRuntime::new(cli).run().await?;
    assert_eq!(summary.total, 3);
    assert_eq!(summary.status_counts.get(&202), Some(&3));
    assert_eq!(mock.state.hits(), 3);
    Ok(())
}
