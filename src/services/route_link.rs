use crate::structs::accounts::Account;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const GOOGLE_MAPS_DIRECTIONS: &str = "https://www.google.com/maps/dir/?api=1";

/// 組 Google Maps 多點導航網址, 出發地與終點都是 origin
///
/// 沒有停靠點時回傳空字串
pub fn build_route_url(origin: &str, stops: &[Account]) -> String {
    if stops.is_empty() {
        return String::new();
    }

    let origin = encode_component(origin);
    let waypoints = stops
        .iter()
        .map(|stop| encode_component(&stop.address))
        .collect::<Vec<_>>()
        .join("|");

    format!(
        "{GOOGLE_MAPS_DIRECTIONS}&origin={origin}&destination={origin}&waypoints={waypoints}&travelmode=driving"
    )
}

/// 和瀏覽器的 encodeURIComponent 一樣, 這些字元不編碼
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}
