//! Loading relays from config and remote relay-list feeds.

use crate::config::RelayConfig;
use reelcast_common::Relay;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

/// Parse a relay list: one `IPv4:port` per line, everything else ignored.
pub fn parse_relay_list(text: &str) -> Vec<Relay> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.parse::<Relay>().ok())
        .collect()
}

/// Fetch relays from the first source that yields a non-empty list.
///
/// Unreachable sources and error statuses are logged and skipped. An empty
/// result means acquisitions will go direct.
pub async fn fetch_relays(sources: &[String], timeout: Duration) -> Vec<Relay> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            Client::new()
        });

    for source in sources {
        match fetch_source(&client, source).await {
            Ok(relays) if !relays.is_empty() => {
                tracing::info!("Loaded {} relays from {}", relays.len(), source);
                return relays;
            }
            Ok(_) => {
                tracing::debug!("Relay source {} had no usable entries", source);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch relays from {}: {}", source, e);
            }
        }
    }

    Vec::new()
}

async fn fetch_source(client: &Client, source: &str) -> reqwest::Result<Vec<Relay>> {
    let body = client
        .get(source)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_relay_list(&body))
}

/// Build the startup relay list: static addresses first, then fetched ones.
pub async fn load_relays(config: &RelayConfig) -> Vec<Relay> {
    if !config.enabled {
        tracing::info!("Relays disabled, using direct connection");
        return Vec::new();
    }

    let mut relays: Vec<Relay> = config
        .addresses
        .iter()
        .filter_map(|addr| match addr.parse() {
            Ok(relay) => Some(relay),
            Err(e) => {
                tracing::warn!("Skipping relay address: {}", e);
                None
            }
        })
        .collect();

    if !config.sources.is_empty() {
        relays.extend(fetch_relays(&config.sources, config.fetch_timeout()).await);
    }

    let mut seen = HashSet::new();
    relays.retain(|relay| seen.insert(*relay));

    if relays.is_empty() {
        tracing::info!("No relays loaded, using direct connection");
    }

    relays
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_relay_list_filters_garbage() {
        let text = "1.2.3.4:8080\n\n  5.6.7.8:3128  \nnot-a-relay\nexample.com:80\n9.9.9.9\r\n10.0.0.1:1\n";
        let relays = parse_relay_list(text);
        let rendered: Vec<String> = relays.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["1.2.3.4:8080", "5.6.7.8:3128", "10.0.0.1:1"]);
    }

    #[test]
    fn test_parse_relay_list_empty() {
        assert!(parse_relay_list("").is_empty());
        assert!(parse_relay_list("\n\n").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_relays_first_nonempty_source_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("garbage\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken.txt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/good.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1.1.1.1:80\n2.2.2.2:81\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/later.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("3.3.3.3:82\n"))
            .expect(0)
            .mount(&server)
            .await;

        let sources = vec![
            format!("{}/empty.txt", server.uri()),
            format!("{}/broken.txt", server.uri()),
            format!("{}/good.txt", server.uri()),
            format!("{}/later.txt", server.uri()),
        ];
        let relays = fetch_relays(&sources, Duration::from_secs(5)).await;

        assert_eq!(relays.len(), 2);
        assert_eq!(relays[0].to_string(), "1.1.1.1:80");
    }

    #[tokio::test]
    async fn test_fetch_relays_all_failing_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let sources = vec![format!("{}/missing.txt", server.uri())];
        assert!(fetch_relays(&sources, Duration::from_secs(5)).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_relays_static_first_and_deduplicated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("7.7.7.7:70\n8.8.8.8:80\n"),
            )
            .mount(&server)
            .await;

        let config = RelayConfig {
            enabled: true,
            sources: vec![format!("{}/list.txt", server.uri())],
            addresses: vec!["8.8.8.8:80".to_string(), "bogus".to_string()],
            fetch_timeout_secs: 5,
        };
        let relays = load_relays(&config).await;
        let rendered: Vec<String> = relays.iter().map(ToString::to_string).collect();

        assert_eq!(rendered, vec!["8.8.8.8:80", "7.7.7.7:70"]);
    }

    #[tokio::test]
    async fn test_load_relays_disabled() {
        let config = RelayConfig {
            enabled: false,
            sources: vec!["http://127.0.0.1:1/never".to_string()],
            addresses: vec!["1.2.3.4:5".to_string()],
            fetch_timeout_secs: 1,
        };
        assert!(load_relays(&config).await.is_empty());
    }
}
