use ipscrape::output::write_report;
use ipscrape::{extract_ipv4, extract_ipv6, html};

static TEST_PAGE: &str = include_str!("fixtures/test_page.html");
static EMPTY_PAGE: &str = include_str!("fixtures/empty_page.html");

/// Render a fixture page and run both pipelines plus the report writer,
/// exactly as the binary does.
fn scrape_fixture(markup: &str, url: &str) -> String {
    let text = html::page_text(markup);
    let v4 = extract_ipv4(&text);
    let v6 = extract_ipv6(&text);

    let mut buf = Vec::new();
    write_report(&mut buf, &v4, &v6, url).expect("write to Vec cannot fail");
    String::from_utf8(buf).expect("report is UTF-8")
}

#[test]
fn scrapes_fixture_page_into_expected_report() {
    let report = scrape_fixture(TEST_PAGE, "http://test_page.html");

    // Duplicates collapse, the multicast address is excluded, the bogus
    // octets and the five-part version string never validate, and blocks
    // print ascending within each family.
    let expected = "================\n\
                    IPv4 addresses:\n\
                    192.0.2.1/32\n\
                    198.51.100.0/24\n\
                    203.0.113.7/32\n\
                    ================\n\
                    IPv6 addresses:\n\
                    2001:db8::1/128\n\
                    2a03:2880:2130:cf05::/64\n";
    assert_eq!(report, expected);
}

#[test]
fn empty_page_reports_both_families_empty() {
    let url = "http://test_html_empty.html";
    let report = scrape_fixture(EMPTY_PAGE, url);

    let expected = format!(
        "================\n\
         IPv4 addresses:\n\
         No addresses found when scraping {url}\n\
         ================\n\
         IPv6 addresses:\n\
         No addresses found when scraping {url}\n"
    );
    assert_eq!(report, expected);
}

#[test]
fn pipelines_are_pure_over_rendered_text() {
    let text = html::page_text(TEST_PAGE);
    assert_eq!(extract_ipv4(&text), extract_ipv4(&text));
    assert_eq!(extract_ipv6(&text), extract_ipv6(&text));
}

#[test]
fn raw_markup_and_rendered_text_agree_here() {
    // Extraction does not require rendering; rendering only removes markup.
    // For this fixture the address inventory is identical either way.
    let rendered = html::page_text(TEST_PAGE);
    assert_eq!(extract_ipv4(TEST_PAGE), extract_ipv4(&rendered));
}
