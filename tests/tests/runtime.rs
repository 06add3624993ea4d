mod utils;
#[allow(unused)]
use utils::*;

use clap::Parser;
use volley_runtime::{VolleyCli, VolleyRuntime};

fn runtime(args: &[&str]) -> anyhow::Result<VolleyRuntime> {
    let args = std::iter::once("volley").chain(args.iter().copied());
    Ok(VolleyRuntime::new(VolleyCli::try_parse_from(args)?))
}

#[tokio::test]
async fn runs_from_command_line() -> anyhow::Result<()> {
    let mock = init().await;
    let url = mock.url("/echo");

    let runtime = runtime(&[
        "--total-requests",
        "8",
        "--concurrent-requests",
        "3",
        "--requests-per-second",
        "200",
        "--api-url",
        &url,
        "--json-body",
        r#"{"hello": "world"}"#,
        "--client-id",
        "runtime-test",
        "--json",
    ])?;

    let summary = runtime.run().await?;
    assert_eq!(summary.total, 8);
    assert_eq!(summary.success_count, 8);
    assert_eq!(mock.state.hits(), 8);

    let rendered: serde_json::Value = serde_json::from_str(&runtime.render(&summary)?)?;
    assert_eq!(rendered["total"], 8);
    assert_eq!(rendered["status_counts"]["200"], 8);
    assert_eq!(rendered["unit"], "per_second");
    Ok(())
}

#[tokio::test]
async fn per_minute_text_report() -> anyhow::Result<()> {
    let mock = init().await;
    let url = mock.url("/status/418");

    let runtime = runtime(&[
        "--total-requests",
        "2",
        "--concurrent-requests",
        "2",
        "--requests-per-second",
        "100",
        "--api-url",
        &url,
        "--json-body",
        "{}",
        "--method",
        "GET",
        "--per-minute",
    ])?;

    let summary = runtime.run().await?;
    let text = runtime.render(&summary)?;
    assert!(text.contains("Total requests: 2"));
    assert!(text.contains("requests/min"));
    assert!(text.contains("HTTP 418: 2"));
    Ok(())
}

#[tokio::test]
async fn malformed_body_sends_nothing() -> anyhow::Result<()> {
    let mock = init().await;
    let url = mock.url("/echo");

    let runtime = runtime(&[
        "--total-requests",
        "5",
        "--concurrent-requests",
        "1",
        "--requests-per-second",
        "10",
        "--api-url",
        &url,
        "--json-body",
        "{\"unterminated\": ",
    ])?;

    let err = runtime.run().await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(mock.state.hits(), 0);
    Ok(())
}
