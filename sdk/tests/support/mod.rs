//! Wire fixtures shared by the integration suites.

use moysklad_sdk::domain::{Auth, Credentials};
use serde_json::{Value, json};

pub const HOST: &str = "https://online.moysklad.ru/api/remap/1.1";

pub fn auth() -> Auth {
    Auth::Basic(Credentials::try_from_parts("admin@shop", "secret").expect("valid credentials"))
}

/// Deterministic UUID whose last byte is `n`.
pub fn uuid(n: u8) -> String {
    format!("00000000-0000-4000-8000-0000000000{n:02x}")
}

pub fn meta(path: &str, kind: &str) -> Value {
    json!({ "href": format!("{HOST}/{path}"), "type": kind })
}

pub fn rows(records: Vec<Value>) -> Value {
    json!({ "meta": { "size": records.len() }, "rows": records })
}

pub fn employee() -> Value {
    json!({
        "meta": meta("context/employee", "employee"),
        "id": uuid(1),
        "name": "Ivanov",
        "uid": "admin@shop",
    })
}

pub fn company_settings() -> Value {
    json!({
        "meta": meta("context/companysettings", "companysettings"),
        "currency": currency(2, "rub"),
    })
}

pub fn currency(n: u8, name: &str) -> Value {
    json!({
        "meta": meta(&format!("entity/currency/{}", uuid(n)), "currency"),
        "id": uuid(n),
        "name": name,
    })
}

pub fn group(n: u8) -> Value {
    json!({
        "meta": meta(&format!("entity/group/{}", uuid(n)), "group"),
        "id": uuid(n),
        "name": format!("group {n}"),
    })
}

pub fn metadata() -> Value {
    json!({
        "counterparty": {
            "groups": ["vip", "wholesale"],
            "states": [{
                "meta": meta(&format!("entity/counterparty/metadata/states/{}", uuid(9)), "state"),
                "id": uuid(9),
                "name": "New",
            }],
        },
        "product": { "priceTypes": [{ "name": "Retail" }, { "name": "Bulk" }] },
        "customerorder": { "createShared": true },
    })
}

pub fn counterparty(n: u8) -> Value {
    json!({
        "meta": meta(&format!("entity/counterparty/{}", uuid(n)), "counterparty"),
        "id": uuid(n),
        "name": format!("client {n}"),
    })
}

pub fn counterparty_report(n: u8, balance: f64) -> Value {
    json!({
        "meta": meta(&format!("report/counterparty/{}", uuid(n)), "counterparty"),
        "counterparty": { "meta": meta(&format!("entity/counterparty/{}", uuid(n)), "counterparty") },
        "balance": balance,
    })
}

pub fn product(n: u8, folder: &str) -> Value {
    json!({
        "meta": meta(&format!("entity/product/{}", uuid(n)), "product"),
        "id": uuid(n),
        "name": format!("item {n}"),
        "productFolder": {
            "meta": meta(&format!("entity/productfolder/{folder}"), "productfolder"),
            "id": uuid(200),
            "name": folder,
        },
    })
}

pub fn customer_order(n: u8, moment: &str) -> Value {
    json!({
        "meta": meta(&format!("entity/customerorder/{}", uuid(n)), "customerorder"),
        "id": uuid(n),
        "name": format!("{n:05}"),
        "moment": moment,
    })
}
