use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn item(number: &str, status: &str, price: &str, delivery: &str) -> String {
    format!(
        "<li class=\"RedOrderList_OrderList__item__a2315\">\
         <div class=\"RedOrderList_OrderItem__tag__1tjf5\">{status}</div>\
         <div class=\"RedOrderList_OrderItem__number__1tjf5\">{number}</div>\
         <h4 class=\"RedOrderList_OrderItem__title__1tjf5\">{delivery}</h4>\
         <div class=\"RedOrderList_OrderItem__totalPrice__1tjf5\">{price}</div>\
         <img src=\"./Orders_files/item.jpg\"></li>"
    )
}

fn write_collection(dir: &Path, items: &[String]) {
    std::fs::create_dir_all(dir.join("Orders_files")).unwrap();
    std::fs::write(dir.join("Orders_files").join("item.jpg"), b"jpeg").unwrap();
    std::fs::write(dir.join("Orders.html"), format!("<ul>{}</ul>", items.concat())).unwrap();
}

fn ordertrack(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ordertrack").unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_generate_offline_writes_report_and_cache() {
    let home = tempfile::tempdir().unwrap();
    let base = tempfile::tempdir().unwrap();
    std::fs::write(base.path().join("exchange_rate_cache.json"), r#"{"rate": 0.5}"#).unwrap();
    write_collection(
        &base.path().join("active"),
        &[
            item("1234 5678 9012 3456", "Awaiting payment — time for payment", "$1,00", "N/A"),
            item("9999 8888 7777 6666", "In transit", "$10,00", "Delivery by 12 February 2026"),
        ],
    );
    write_collection(
        &base.path().join("archive"),
        &[item("1111 2222 3333 4444", "Delivered", "€3,25", "Delivered on 2 January 2026")],
    );

    ordertrack(home.path())
        .args(["--offline", "--base-dir"])
        .arg(base.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(cached)"))
        .stdout(predicate::str::contains("2 orders total (1 active, 1 archived)"))
        .stdout(predicate::str::contains("€8.25"));

    let html = std::fs::read_to_string(base.path().join("AliExpress_Orders.html")).unwrap();
    assert!(html.contains("9999 8888 7777 6666"));
    assert!(!html.contains("1234 5678 9012 3456"));
    assert!(html.contains("https://aliexpress.ru/order-list/1111222233334444"));
    assert!(html.contains("data:image/jpeg;base64,anBlZw=="));
    assert!(html.contains("€5,00"));
    assert!(html.contains("Received"));

    let cache: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(base.path().join("exchange_rate_cache.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(cache, serde_json::json!({"current": 0.5, "historical": {}}));
}

#[test]
fn test_generate_without_pages_reports_nothing_found() {
    let home = tempfile::tempdir().unwrap();
    let base = tempfile::tempdir().unwrap();
    ordertrack(home.path())
        .args(["generate", "--offline", "--base-dir"])
        .arg(base.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("No orders found"));
    assert!(!base.path().join("AliExpress_Orders.html").exists());
}

#[test]
fn test_list_prints_table() {
    let home = tempfile::tempdir().unwrap();
    let base = tempfile::tempdir().unwrap();
    write_collection(
        &base.path().join("active"),
        &[item("9999 8888 7777 6666", "In transit", "€2,00", "Delivery by 3 March")],
    );
    ordertrack(home.path())
        .args(["list", "--offline", "--base-dir"])
        .arg(base.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("9999 8888 7777 6666"))
        .stdout(predicate::str::contains("1 orders"));
}

#[test]
fn test_rates_shows_migrated_cache() {
    let home = tempfile::tempdir().unwrap();
    let base = tempfile::tempdir().unwrap();
    std::fs::write(
        base.path().join("exchange_rate_cache.json"),
        r#"{"current": 0.9, "historical": {"2026-01-02": 0.91, "2026-01-09": 0.92}}"#,
    )
    .unwrap();
    ordertrack(home.path())
        .args(["rates", "--base-dir"])
        .arg(base.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Current:     0.9"))
        .stdout(predicate::str::contains("2 days, 2026-01-02 to 2026-01-09"));
}

#[test]
fn test_invalid_settings_fail() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join(".config").join("ordertrack");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(config.join("settings.json"), r#"{"default_rate": -1.0}"#).unwrap();
    let base = tempfile::tempdir().unwrap();
    ordertrack(home.path())
        .args(["--offline", "--base-dir"])
        .arg(base.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_rate"));
}
