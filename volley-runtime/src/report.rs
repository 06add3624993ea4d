use volley_core::Summary;

pub(crate) fn render(summary: &Summary, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(summary)
    } else {
        Ok(summary.to_string().trim_end().to_string())
    }
}
