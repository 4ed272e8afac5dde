use monitor_editais::config::AppConfig;
use monitor_editais::ingest::fetch::Fetcher;
use monitor_editais::ingest::providers::html::{collect_html, extract_anchors};
use monitor_editais::ingest::types::{Method, SourceMap};
use monitor_editais::relevance::KeywordFilter;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAPEMA_HTML: &str = include_str!("fixtures/fapema_editais.html");

#[test]
fn fixture_anchors_skip_navigation_junk() {
    let page = Url::parse("https://www.fapema.br/portal/editais/").unwrap();
    let anchors = extract_anchors(FAPEMA_HTML, &page);
    let hrefs: Vec<&str> = anchors.iter().map(|a| a.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec![
            "https://www.fapema.br/portal/",
            "https://www.fapema.br/edital-05-2024",
            "https://www.fapema.br/portal/editais/chamada-inovacao-2024/",
            "https://www.fapema.br/edital-05-2024",
            "https://www.fapema.br/licitacao-07-2024",
            "https://www.fapema.br/portal/institucional",
        ]
    );
    assert_eq!(anchors[2].text, "Chamada Pública Inovação 2024");
}

#[tokio::test]
async fn collects_relevant_links_and_survives_dead_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/portal/editais/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FAPEMA_HTML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cnpq/chamadas"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = server.uri();
    let map: SourceMap = [
        ("CNPq - Chamadas".to_string(), format!("{base}/cnpq/chamadas")),
        ("FAPEMA - Editais".to_string(), format!("{base}/portal/editais/")),
    ]
    .into_iter()
    .collect();

    let fetcher = Fetcher::new(&AppConfig::default()).unwrap();
    let items = collect_html(&fetcher, &map, &KeywordFilter::default()).await;

    // The repeated anchor is still here; de-duplication happens at run level.
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.source == "FAPEMA - Editais"));
    assert!(items.iter().all(|i| i.method == Method::Html));
    assert!(items.iter().all(|i| i.published_at.is_none() && i.summary.is_empty()));
    assert_eq!(items[0].link, format!("{base}/edital-05-2024"));
    assert_eq!(items[0].title, "Edital FAPEMA 05/2024 - Apoio à Pesquisa");
    assert_eq!(
        items[1].link,
        format!("{base}/portal/editais/chamada-inovacao-2024/")
    );
    assert!(!items.iter().any(|i| i.link.contains("licitacao")));
}
