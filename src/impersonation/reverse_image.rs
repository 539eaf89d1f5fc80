// Reverse image search links for the profile picture.
//
// Each engine accepts the image address as a query parameter, so the link
// is the engine prefix followed by the fully percent-encoded picture URL.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Everything except unreserved URL characters is escaped, `/` and `:` included.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const ENGINES: [(&str, &str); 4] = [
    ("Google Lens", "https://lens.google.com/uploadbyurl?url="),
    ("Yandex", "https://yandex.com/images/search?rpt=imageview&url="),
    ("TinEye", "https://tineye.com/search?url="),
    (
        "Bing",
        "https://www.bing.com/images/search?view=detailv2&iss=sbi&q=imgurl:",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseImageLink {
    pub engine: String,
    pub url: String,
}

/// One search link per engine, or none for a blank picture URL.
pub fn reverse_image_links(picture_url: &str) -> Vec<ReverseImageLink> {
    let picture_url = picture_url.trim();
    if picture_url.is_empty() {
        return Vec::new();
    }
    let encoded = utf8_percent_encode(picture_url, COMPONENT).to_string();
    ENGINES
        .iter()
        .map(|(engine, prefix)| ReverseImageLink {
            engine: engine.to_string(),
            url: format!("{prefix}{encoded}"),
        })
        .collect()
}
