//! Report prompt composition.

const NO_SITE: &str = "No file";
const NO_COMPETITORS: &str = "No files";

/// Build the report request sent alongside the uploaded files.
///
/// Names are the original filenames of every file the user provided,
/// whether or not its upload succeeded.
pub fn compose_report_prompt(
    site_name: Option<&str>,
    competitor_names: &[&str],
    keyword: &str,
) -> String {
    let site = site_name.unwrap_or(NO_SITE);
    let competitors = if competitor_names.is_empty() {
        NO_COMPETITORS.to_string()
    } else {
        competitor_names.join(", ")
    };
    format!(
        "My web page is {site}, the competitors' web pages are {competitors} and my main keyword is {keyword}."
    )
}
