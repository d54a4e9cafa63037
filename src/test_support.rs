//! A stand-in for the calendar export service, shared by the fetch, server and batch tests.

use axum::extract::RawQuery;
use axum::routing::get;
use axum::Router;
use url::Url;

pub const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<calendar>
  <event>
    <link id="42"/>
    <title>Lecture</title>
    <location>Wu Hall</location>
    <room>B17</room>
  </event>
  <event>
    <link id="5"/>
    <location>Levine</location>
    <room> </room>
  </event>
</calendar>
"#;

pub const ICAL: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//UPenn//Calendar Export//EN\r\n\
BEGIN:VEVENT\r\n\
UID:42@upenn.edu\r\n\
SUMMARY:Lecture\r\n\
LOCATION:TBD\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:5@upenn.edu\r\n\
SUMMARY:Seminar\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:1000@upenn.edu\r\n\
SUMMARY:Unlisted\r\n\
LOCATION:TBD\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

/// `ICAL` after the rewrite with the default timezone.
pub const FIXED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//UPenn//Calendar Export//EN\r\n\
BEGIN:VEVENT\r\n\
UID:42@upenn.edu\r\n\
SUMMARY:Lecture\r\n\
LOCATION:Wu Hall B17\r\n\
TZID:America/New_York\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:5@upenn.edu\r\n\
SUMMARY:Seminar\r\n\
LOCATION:Levine  \r\n\
TZID:America/New_York\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:1000@upenn.edu\r\n\
SUMMARY:Unlisted\r\n\
LOCATION:TBD\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

const MAINTENANCE: &str = "<html><body><h1>Down for maintenance</h1></body></html>";

async fn listing(RawQuery(query): RawQuery) -> &'static str {
    if query.unwrap_or_default().contains("type=ical2") {
        ICAL
    } else {
        XML
    }
}

/// Serves the fixtures on a thread of its own, so blocking clients can call it from any test.
///
/// `calendar-export/` answers with `ICAL` for `type=ical2` and `XML` otherwise.
/// `maintenance/` answers every request with an HTML page.
pub fn export_service() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async move {
            let app = Router::new()
                .route("/calendar-export/", get(listing))
                .route("/maintenance/", get(|| async { MAINTENANCE }));
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();

            axum::serve(listener, app).await.unwrap();
        });
    });

    Url::parse(&format!("http://{addr}/calendar-export/")).unwrap()
}

/// Base url whose answers are HTML instead of calendar data.
pub fn maintenance_page() -> Url {
    export_service().join("../maintenance/").unwrap()
}
