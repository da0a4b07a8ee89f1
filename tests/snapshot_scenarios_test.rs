//! End-to-end conversions of parsed documents against a mock HTTP server

mod common;

use common::{
    PIXEL_BASE64, create_bytes_mock, create_error_mock, init_logger, setup_mock_server,
    spawn_silent_server, test_config, test_renderer, test_url, HANG_GUARD,
};
use kodegen_tools_domshot::{
    FallbackPolicy, FetchConfig, PseudoElement, RenderError, RenderOptions, SourceNode,
    StaticDocument, StaticNode, StyleSheet, to_vector_image,
};
use std::time::Duration;

#[tokio::test]
async fn styled_div_with_background() {
    init_logger();
    let doc = StaticDocument::parse_html(
        r#"<html><body><div id="box" style="color: red; width: 100px; height: 50px">Hello</div></body></html>"#,
        None,
    );
    let node = doc.element_by_id("box").expect("box");
    let options = RenderOptions::builder().background_color("white").build();

    let uri = to_vector_image(&doc, &node, &options).await.expect("conversion");

    assert!(uri.starts_with("data:image/svg+xml;charset=utf-8,<svg "));
    assert!(uri.contains(r#"width="100" height="50""#));
    assert!(uri.contains("color: red;"));
    assert!(uri.contains("background-color: white;"));
    assert!(uri.contains(">Hello<"));
}

#[tokio::test]
async fn missing_image_becomes_the_placeholder() {
    init_logger();
    let mut server = setup_mock_server().await;
    let missing = create_error_mock(&mut server, "/missing.png", 404).await;

    let node = StaticNode::element("div")
        .child(StaticNode::element("img").attr("src", test_url(&server, "/missing.png")))
        .build();
    let renderer = test_renderer(&FetchConfig::default()).unwrap();

    let uri = renderer
        .to_vector_image(&Vec::<StyleSheet>::new(), &node, &RenderOptions::default())
        .await
        .expect("404 is absorbed");

    missing.assert_async().await;
    assert!(uri.contains(&format!("src=\"data:image/png;base64,{PIXEL_BASE64}\"")));
}

#[tokio::test]
async fn strict_policy_rejects_missing_images() {
    let mut server = setup_mock_server().await;
    let _missing = create_error_mock(&mut server, "/missing.png", 500).await;

    let node = StaticNode::element("div")
        .child(StaticNode::element("img").attr("src", test_url(&server, "/missing.png")))
        .build();
    let config = test_config(Duration::from_secs(5), FallbackPolicy::Propagate);
    let renderer = test_renderer(&config).unwrap();

    let error = renderer
        .to_vector_image(&Vec::<StyleSheet>::new(), &node, &RenderOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(error, RenderError::Fetch { .. }), "got {error:?}");
}

#[tokio::test]
async fn relative_images_resolve_against_base_url() {
    let mut server = setup_mock_server().await;
    let gif = base64_decode(PIXEL_BASE64);
    let logo = create_bytes_mock(&mut server, "/assets/logo.gif", "image/gif", &gif).await;

    let doc = StaticDocument::parse_html(
        r#"<html><body><p><img src="logo.gif"></p></body></html>"#,
        None,
    );
    let options = RenderOptions::builder()
        .base_url(test_url(&server, "/assets/"))
        .build();
    let renderer = test_renderer(&FetchConfig::default()).unwrap();

    let uri = renderer
        .to_vector_image(&doc, doc.root(), &options)
        .await
        .expect("conversion");

    logo.assert_async().await;
    assert!(uri.contains(&format!("data:image/gif;base64,{PIXEL_BASE64}")));
}

#[tokio::test]
async fn pseudo_element_content_is_emulated() {
    let node = StaticNode::element("p")
        .child(StaticNode::text("rated"))
        .pseudo(PseudoElement::Before, "\"★\"")
        .build();

    let uri = to_vector_image(&Vec::<StyleSheet>::new(), &node, &RenderOptions::default())
        .await
        .expect("conversion");

    let class_start = uri.find("class=\"").expect("class attribute") + "class=\"".len();
    let class = &uri[class_start..class_start + 6];
    assert!(class.starts_with('u'));
    assert!(uri.contains(&format!(".{class}:before{{content: \"★\";}}")));
}

#[tokio::test]
async fn web_fonts_from_linked_sheets_are_embedded() {
    let mut server = setup_mock_server().await;
    let font = create_bytes_mock(&mut server, "/fonts/inter.woff2", "font/woff2", b"wOF2").await;

    let html = r#"<html><head><link rel="stylesheet" href="/css/site.css"></head><body><p>Text</p></body></html>"#;
    let page_url = test_url(&server, "/index.html");
    let doc = StaticDocument::parse_html(html, Some(&page_url)).with_style_sheet(
        &test_url(&server, "/css/site.css"),
        "@font-face { font-family: Inter; src: url(../fonts/inter.woff2) format('woff2'); }\n\
         p { font-family: Inter; }",
    );
    let renderer = test_renderer(&FetchConfig::default()).unwrap();

    let uri = renderer
        .to_vector_image(&doc, doc.root(), &RenderOptions::default())
        .await
        .expect("conversion");

    font.assert_async().await;
    assert!(uri.contains("src: url(data:application/font-woff;base64,d09GMg==) format('woff2');"));
}

#[tokio::test]
async fn filter_never_drops_the_root() {
    let doc = StaticDocument::parse_html(
        r#"<html><body><section class="ad"><p class="ad">x</p><p>kept</p></section></body></html>"#,
        None,
    );
    let section = doc.root().children()[0].clone();
    let options = RenderOptions::builder()
        .filter(|node: &StaticNode| node.attribute("class") != Some("ad"))
        .build();

    let uri = to_vector_image(&doc, &section, &options).await.expect("conversion");

    assert!(uri.contains("<section "));
    assert!(uri.contains(">kept<"));
    assert!(!uri.contains(">x<"));
}

#[tokio::test]
async fn unresponsive_font_host_times_out() {
    init_logger();
    let silent = spawn_silent_server().await.unwrap();
    let sheet = StyleSheet::readable(
        None,
        kodegen_tools_domshot::style::parse_rules(&format!(
            "@font-face {{ src: url({silent}/slow.woff); }}"
        )),
    );
    let node = StaticNode::element("div").build();
    let config = test_config(Duration::from_millis(200), FallbackPolicy::TransparentPixel);
    let renderer = test_renderer(&config).unwrap();

    let result = tokio::time::timeout(
        HANG_GUARD,
        renderer.to_vector_image(&vec![sheet], &node, &RenderOptions::default()),
    )
    .await
    .expect("conversion must not hang past its fetch timeout");

    let error = result.unwrap_err();
    assert!(error.is_timeout(), "got {error:?}");
    assert!(error.to_string().contains("slow.woff"));
}

fn base64_decode(encoded: &str) -> Vec<u8> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .expect("valid base64")
}
