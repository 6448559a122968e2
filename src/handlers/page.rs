use actix_web::Responder;
use maud::{html, Markup, DOCTYPE};

use crate::handlers::{Css, Js};

/// Timezone choices offered by the converter page.
const TIMEZONE_OPTIONS: &[(&str, &str)] = &[
    ("Local", "System timezone"),
    ("UTC", "UTC"),
    ("Asia/Shanghai", "Asia/Shanghai (CST)"),
    ("Asia/Tokyo", "Asia/Tokyo (JST)"),
    ("Asia/Hong_Kong", "Asia/Hong_Kong (HKT)"),
    ("Asia/Singapore", "Asia/Singapore (SGT)"),
    ("Asia/Bangkok", "Asia/Bangkok (ICT)"),
    ("Asia/Dubai", "Asia/Dubai (GST)"),
    ("Australia/Sydney", "Australia/Sydney (AEDT)"),
    ("America/New_York", "America/New_York (EST)"),
    ("America/Chicago", "America/Chicago (CST)"),
    ("America/Los_Angeles", "America/Los_Angeles (PST)"),
    ("Europe/London", "Europe/London (GMT)"),
    ("Europe/Paris", "Europe/Paris (CET)"),
    ("Europe/Berlin", "Europe/Berlin (CET)"),
    ("Europe/Moscow", "Europe/Moscow (MSK)"),
    ("Africa/Cairo", "Africa/Cairo (EET)"),
    ("Africa/Johannesburg", "Africa/Johannesburg (SAST)"),
    ("Pacific/Auckland", "Pacific/Auckland (NZDT)"),
];

/// Fields of the result card, paired with their element ids. `app.js` fills
/// these from the `/api/convert` response.
const RESULT_ROWS: &[(&str, &str)] = &[
    ("iso8601", "ISO 8601"),
    ("date", "Date"),
    ("time", "Time"),
    ("timestamp", "Timestamp (s)"),
    ("timestamp_ms", "Timestamp (ms)"),
    ("timestamp_us", "Timestamp (µs)"),
    ("weekday", "Weekday"),
    ("zero_timestamp", "Start of day"),
    ("timezone_info", "Timezone"),
];

/// The converter page, served on every path the API does not claim.
pub async fn page_handler() -> impl Responder {
    converter_page()
}

fn converter_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "easytime - time converter" }
                (Css("/res/styles.css"))
            }
            body {
                .container {
                    .header {
                        h1 { "⏰ easytime" }
                        p { "Convert timestamps and dates across timezones" }
                    }
                    .content {
                        form #convertForm {
                            .form-group {
                                label for="input" { "Time or timestamp" }
                                input #input type="text"
                                    placeholder="e.g. 2024-01-29 or 1706486400"
                                    autocomplete="off";
                            }
                            .form-group {
                                label for="timezone" { "Timezone" }
                                select #timezone {
                                    @for &(value, label) in TIMEZONE_OPTIONS {
                                        option value=(value) { (label) }
                                    }
                                }
                            }
                            .button-group {
                                button .btn-convert type="submit" { "Convert" }
                                button .btn-now #nowBtn type="button" { "Current time" }
                            }
                            .error #error {}
                        }
                        .loading #loading {
                            .spinner {}
                        }
                        .result #result {
                            @for &(id, label) in RESULT_ROWS {
                                .result-item {
                                    span .result-label { (label) }
                                    span .result-value #(id) {}
                                    @if id != "weekday" {
                                        button .copy-btn data-copy-target=(id) { "Copy" }
                                    }
                                }
                            }
                        }
                    }
                }
                .success-msg #successMsg { "Copied to clipboard" }
                (Js("/res/app.js"))
            }
        }
    }
}
