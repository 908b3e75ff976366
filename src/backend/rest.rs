use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Method, Url};

use super::client::{SupabaseClient, check};
use super::{RowFilter, SessionRow, SessionTable};
use crate::error::BackendError;

pub const SESSIONS_TABLE: &str = "chat_sessions";

/// The `chat_sessions` table through PostgREST (`/rest/v1`).
#[derive(Clone)]
pub struct SessionsTable {
    client: SupabaseClient,
}

impl SessionsTable {
    pub(crate) const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn table_url(&self, filter: Option<&RowFilter>) -> Result<Url, BackendError> {
        let mut url = self.client.endpoint(&format!("rest/v1/{SESSIONS_TABLE}"))?;
        if let Some(filter) = filter {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in filter_query(filter) {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}

/// PostgREST query parameters for a row filter.
pub fn filter_query(filter: &RowFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![("user_id", format!("eq.{}", filter.user_id))];

    match filter.statuses.as_slice() {
        [] => {}
        [status] => params.push(("status", format!("eq.{status}"))),
        statuses => {
            let list: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
            params.push(("status", format!("in.({})", list.join(","))));
        }
    }

    if let Some(cutoff) = filter.created_before {
        params.push((
            "created_at",
            format!("lt.{}", cutoff.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ));
    }

    params
}

#[async_trait]
impl SessionTable for SessionsTable {
    async fn upsert(&self, row: &SessionRow) -> Result<(), BackendError> {
        let url = self.table_url(None)?;
        let response = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn select(&self, filter: &RowFilter) -> Result<Vec<SessionRow>, BackendError> {
        let mut url = self.table_url(Some(filter))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.client.request(Method::GET, url).send().await?;
        let body = check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete(&self, filter: &RowFilter) -> Result<(), BackendError> {
        let url = self.table_url(Some(filter))?;
        let response = self.client.request(Method::DELETE, url).send().await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::SessionMetrics;
    use crate::model::{SessionStatus, find_language};
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{header, headers, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row(id: &str, status: SessionStatus) -> SessionRow {
        SessionRow {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            scenario_id: "cafe".to_string(),
            messages: Vec::new(),
            source_language: find_language("en").unwrap(),
            target_language: find_language("es").unwrap(),
            status,
            metrics: SessionMetrics {
                message_count: 0,
                duration: 1_000,
                last_updated: 1_700_000_000_000,
            },
            created_at: None,
        }
    }

    #[test]
    fn test_filter_query_for_fetch() {
        let filter = RowFilter::for_user("user-1")
            .with_statuses(&[SessionStatus::Completed, SessionStatus::Saved]);

        assert_eq!(
            filter_query(&filter),
            vec![
                ("user_id", "eq.user-1".to_string()),
                ("status", "in.(completed,saved)".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_query_for_cleanup() {
        let cutoff = Utc.with_ymd_and_hms(2026, 9, 18, 12, 0, 0).unwrap();
        let filter = RowFilter::for_user("user-1")
            .with_statuses(&[SessionStatus::Completed])
            .created_before(cutoff);

        assert_eq!(
            filter_query(&filter),
            vec![
                ("user_id", "eq.user-1".to_string()),
                ("status", "eq.completed".to_string()),
                ("created_at", "lt.2026-09-18T12:00:00.000Z".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_upsert_merges_duplicates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/chat_sessions"))
            .and(headers(
                "prefer",
                vec!["resolution=merge-duplicates", "return=minimal"],
            ))
            .and(header("apikey", "anon"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let table = SupabaseClient::new(&server.uri(), "anon".into())
            .unwrap()
            .sessions_table();
        table.upsert(&row("s1", SessionStatus::Saved)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["id"], "s1");
        assert_eq!(body["status"], "saved");
        assert_eq!(body["metrics"]["messageCount"], 0);
        assert_eq!(body["target_language"]["code"], "es");
        assert!(body.get("created_at").is_none());
    }

    #[tokio::test]
    async fn test_select_sends_filters_and_order() {
        let server = MockServer::start().await;
        let mut newest = row("s2", SessionStatus::Completed);
        newest.created_at = Some(Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0).unwrap());

        Mock::given(method("GET"))
            .and(path("/rest/v1/chat_sessions"))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("status", "in.(completed,saved)"))
            .and(query_param("order", "created_at.desc"))
            .and(query_param("select", "*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![newest.clone()]))
            .expect(1)
            .mount(&server)
            .await;

        let table = SupabaseClient::new(&server.uri(), "anon".into())
            .unwrap()
            .sessions_table();
        let filter = RowFilter::for_user("user-1")
            .with_statuses(&[SessionStatus::Completed, SessionStatus::Saved]);

        let rows = table.select(&filter).await.unwrap();
        assert_eq!(rows, vec![newest]);
    }

    #[tokio::test]
    async fn test_delete_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/chat_sessions"))
            .respond_with(ResponseTemplate::new(403).set_body_json(
                serde_json::json!({"message": "permission denied for table chat_sessions"}),
            ))
            .mount(&server)
            .await;

        let table = SupabaseClient::new(&server.uri(), "anon".into())
            .unwrap()
            .sessions_table();
        let err = table
            .delete(&RowFilter::for_user("user-1"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("permission denied"));
    }
}
