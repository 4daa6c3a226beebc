//! HTML rendering for the explorer pages.
//!
//! Every interpolated value goes through [`escape`].

use std::fmt::Write;

use crate::blockcypher::{CoinSymbol, TxInput, TxOutput};
use crate::http::flash::Message;
use crate::http::urls;
use crate::transactions::{RawTxForm, TransactionOverview};

/// Seconds between confidence polls on unconfirmed transaction pages.
pub const POLL_INTERVAL_SECS: u64 = 5;

const SATOSHIS_PER_COIN: u64 = 100_000_000;

/// Escape text for HTML element and attribute context.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Satoshis as a decimal coin amount with ticker, e.g. `0.00010000 BTC`.
pub fn format_amount(satoshis: u64, coin: CoinSymbol) -> String {
    format!(
        "{}.{:08} {}",
        satoshis / SATOSHIS_PER_COIN,
        satoshis % SATOSHIS_PER_COIN,
        coin.currency_abbrev()
    )
}

fn format_signed_amount(satoshis: i64, coin: CoinSymbol) -> String {
    let sign = if satoshis < 0 { "-" } else { "" };
    format!("{}{}", sign, format_amount(satoshis.unsigned_abs(), coin))
}

fn layout(title: &str, messages: &[Message], body: &str) -> String {
    let mut notices = String::new();
    for message in messages {
        let _ = write!(
            notices,
            r#"<div class="alert alert-{}">{}</div>"#,
            message.level.as_str(),
            escape(&message.text)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Transaction Explorer</title>
</head>
<body>
<nav><a href="{home}">Transaction Explorer</a></nav>
<div class="messages">{notices}</div>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        home = urls::home_path(),
        notices = notices,
        body = body,
    )
}

fn coin_links() -> String {
    let mut out = String::from("<ul class=\"coins\">");
    for coin in CoinSymbol::ALL {
        let _ = write!(
            out,
            r#"<li><a href="{}">{}</a></li>"#,
            urls::coin_overview_path(coin),
            escape(coin.display_name())
        );
    }
    out.push_str("</ul>");
    out
}

fn lookup_form(coin: CoinSymbol) -> String {
    // Plain GET form; a small script turns the hash into the overview path
    format!(
        r#"<form class="tx-lookup" onsubmit="window.location='/{coin}/tx/'+encodeURIComponent(this.h.value.trim())+'/';return false;">
<input name="h" placeholder="Transaction hash" size="70">
<button type="submit">Look up</button>
</form>"#,
        coin = coin.as_str()
    )
}

pub fn home(messages: &[Message]) -> String {
    let body = format!(
        "<h1>Transaction Explorer</h1>\n{}\n<p><a href=\"/pushtx/\">Broadcast a raw transaction</a> · <a href=\"/decodetx/\">Decode a raw transaction</a></p>",
        coin_links()
    );
    layout("Home", messages, &body)
}

pub fn coin_overview(coin: CoinSymbol, messages: &[Message]) -> String {
    let body = format!(
        r#"<h1>{name}</h1>
{lookup}
<p><a href="{push}">Broadcast a raw transaction</a> · <a href="{decode}">Decode a raw transaction</a></p>"#,
        name = escape(coin.display_name()),
        lookup = lookup_form(coin),
        push = urls::push_tx_path(coin),
        decode = urls::decode_tx_path(coin),
    );
    layout(coin.display_name(), messages, &body)
}

pub fn not_found(messages: &[Message]) -> String {
    let body = format!("<h1>Page not found</h1>\n{}", coin_links());
    layout("Not Found", messages, &body)
}

fn addresses(list: &Option<Vec<String>>) -> String {
    match list {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|a| escape(a))
            .collect::<Vec<_>>()
            .join("<br>"),
        _ => "<em>Unable to decode address</em>".to_string(),
    }
}

fn input_rows(coin: CoinSymbol, inputs: &[TxInput]) -> String {
    let mut rows = String::new();
    for input in inputs {
        let source = match &input.prev_hash {
            Some(prev) => format!(
                r#"<a href="{}">{}…:{}</a>"#,
                escape(&urls::transaction_path(coin, prev)),
                escape(prev.get(..16).unwrap_or(prev.as_str())),
                input.output_index
            ),
            None => "Coinbase".to_string(),
        };
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            addresses(&input.addresses),
            format_amount(input.output_value, coin),
            escape(input.script_type.as_deref().unwrap_or("")),
            source
        );
    }
    rows
}

fn output_rows(coin: CoinSymbol, outputs: &[TxOutput]) -> String {
    let mut rows = String::new();
    for output in outputs {
        let spent = match &output.spent_by {
            Some(spender) => format!(
                r#"<a href="{}">Spent</a>"#,
                escape(&urls::transaction_path(coin, spender))
            ),
            None => "Unspent".to_string(),
        };
        let who = match &output.data_string {
            Some(data) => format!("<code>{}</code>", escape(data)),
            None => addresses(&output.addresses),
        };
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            who,
            format_amount(output.value, coin),
            escape(output.script_type.as_deref().unwrap_or("")),
            spent
        );
    }
    rows
}

fn confidence_block(overview: &TransactionOverview) -> String {
    if !overview.should_poll() {
        return format!(
            "<p class=\"confirmed\">Confirmed in block {} ({} confirmations)</p>",
            overview.transaction.block_height, overview.transaction.confirmations
        );
    }

    let pct = overview
        .confidence_pct
        .map(|p| format!("{:.2}%", p))
        .unwrap_or_else(|| "Calculating…".to_string());
    let width = overview.confidence_pct_scaled.unwrap_or(0.0);

    format!(
        r#"<div id="confidence">
<p>Unconfirmed. Confidence: <span id="confidence-pct">{pct}</span></p>
<div class="progress"><div id="confidence-bar" class="progress-bar" style="width: {width:.2}%"></div></div>
<p id="double-spend" hidden><strong>Double spend detected!</strong></p>
<p>Seen by <span id="receive-cnt">{receive}</span> peers</p>
</div>
<script>
(function () {{
  var url = "{poll}";
  function poll() {{
    fetch(url).then(function (r) {{ return r.json(); }}).then(function (d) {{
      if (d.confidence_pct !== null) {{ document.getElementById("confidence-pct").textContent = d.confidence_pct.toFixed(2) + "%"; }}
      document.getElementById("confidence-bar").style.width = d.confidence_pct_scaled + "%";
      document.getElementById("double-spend").hidden = !d.double_spend_detected;
      if (d.receive_cnt !== null) {{ document.getElementById("receive-cnt").textContent = d.receive_cnt; }}
    }}).catch(function () {{}});
  }}
  setInterval(poll, {interval});
}})();
</script>"#,
        pct = escape(&pct),
        width = width,
        receive = overview
            .transaction
            .receive_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string()),
        poll = urls::poll_confidence_path(overview.coin_symbol, overview.tx_hash.as_str()),
        interval = POLL_INTERVAL_SECS * 1000,
    )
}

pub fn transaction_overview(overview: &TransactionOverview, messages: &[Message]) -> String {
    let coin = overview.coin_symbol;
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<h1>{name} Transaction</h1>
<p class="tx-hash"><code>{hash}</code></p>
{confidence}
<table class="summary">
<tr><th>Time</th><td>{time}</td></tr>
<tr><th>Received</th><td>{received}</td></tr>
<tr><th>Confirmed</th><td>{confirmed}</td></tr>
<tr><th>Total</th><td>{total}</td></tr>
<tr><th>Fees</th><td>{fees}</td></tr>
<tr><th>Size</th><td>{size} bytes</td></tr>
<tr><th>Relayed by</th><td>{relayed}</td></tr>
</table>
"#,
        name = escape(coin.display_name()),
        hash = escape(overview.tx_hash.as_str()),
        confidence = confidence_block(overview),
        time = overview.time_to_use.format("%Y-%m-%d %H:%M:%S UTC"),
        received = overview.received_at.format("%Y-%m-%d %H:%M:%S UTC"),
        confirmed = overview
            .confirmed_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "Unconfirmed".to_string()),
        total = format_amount(overview.total_satoshis, coin),
        fees = format_amount(overview.fee_in_satoshis, coin),
        size = overview.transaction.size,
        relayed = escape(overview.transaction.relayed_by.as_deref().unwrap_or("Unknown")),
    );

    if overview.is_coinbase_tx {
        let _ = write!(
            body,
            r#"<div class="coinbase">
<h2>Coinbase Transaction</h2>
<p>Block reward: {reward}</p>
<p>Fees collected: {fees}</p>
<p>Coinbase message: <code>{msg}</code></p>
</div>
"#,
            reward = overview
                .total_satoshis_coinbase
                .map(|v| format_amount(v, coin))
                .unwrap_or_default(),
            fees = overview
                .fee_in_satoshis_coinbase
                .map(|v| format_signed_amount(v, coin))
                .unwrap_or_default(),
            msg = escape(overview.coinbase_msg.as_deref().unwrap_or("")),
        );
    }

    let _ = write!(
        body,
        r#"<h2>Inputs ({in_count})</h2>
<table class="inputs"><tr><th>Address</th><th>Value</th><th>Script</th><th>Source</th></tr>{inputs}</table>
<h2>Outputs ({out_count})</h2>
<table class="outputs"><tr><th>Address</th><th>Value</th><th>Script</th><th>Status</th></tr>{outputs}</table>
<p class="api-link"><a href="{api_url}">View API data</a></p>
"#,
        in_count = overview.inputs().len(),
        inputs = input_rows(coin, overview.inputs()),
        out_count = overview.outputs().len(),
        outputs = output_rows(coin, overview.outputs()),
        api_url = escape(&overview.api_url),
    );

    if let Some(hex) = &overview.transaction.hex {
        let _ = write!(
            body,
            r#"<details><summary>Raw transaction</summary><pre class="tx-hex">{}</pre><p><a href="{}?t={}">Decode</a></p></details>"#,
            escape(hex),
            urls::decode_tx_path(coin),
            escape(hex)
        );
    }

    if let Some(key) = &overview.public_key {
        let _ = write!(
            body,
            r#"<script>window.BLOCKCYPHER_PUBLIC_KEY = "{}";</script>"#,
            escape(key)
        );
    }

    layout(&format!("Transaction {}", overview.tx_hash), messages, &body)
}

fn field_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!(r#"<span class="field-error">{}</span>"#, escape(e)))
        .collect()
}

fn coin_select(selected: &str) -> String {
    let mut out = String::from(r#"<select name="coin_symbol" id="coin_symbol">"#);
    for coin in CoinSymbol::ALL {
        let _ = write!(
            out,
            r#"<option value="{value}"{sel}>{name}</option>"#,
            value = coin.as_str(),
            sel = if coin.as_str() == selected { " selected" } else { "" },
            name = escape(coin.display_name()),
        );
    }
    out.push_str("</select>");
    out
}

fn raw_tx_form(action: &str, submit: &str, form: &RawTxForm) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label for="tx_hex">Raw transaction (hex)</label>
<textarea name="tx_hex" id="tx_hex" rows="10" cols="80">{tx_hex}</textarea>
{tx_errors}
<label for="coin_symbol">Network</label>
{select}
{coin_errors}
<button type="submit">{submit}</button>
</form>"#,
        action = escape(action),
        tx_hex = escape(&form.tx_hex),
        tx_errors = field_errors(&form.errors.tx_hex),
        select = coin_select(&form.coin_symbol),
        coin_errors = field_errors(&form.errors.coin_symbol),
        submit = escape(submit),
    )
}

pub fn push_tx(coin: CoinSymbol, form: &RawTxForm, messages: &[Message]) -> String {
    let body = format!(
        "<h1>Broadcast a Raw {} Transaction</h1>\n{}",
        escape(coin.display_name()),
        raw_tx_form(&urls::push_tx_path(coin), "Broadcast Transaction", form)
    );
    layout("Push Raw Transaction", messages, &body)
}

pub fn decode_tx(coin: CoinSymbol, form: &RawTxForm, tx_json: &str, messages: &[Message]) -> String {
    let mut body = format!(
        "<h1>Decode a Raw {} Transaction</h1>\n{}",
        escape(coin.display_name()),
        raw_tx_form(&urls::decode_tx_path(coin), "Decode Transaction", form)
    );
    if !tx_json.is_empty() {
        let _ = write!(body, r#"<h2>Decoded</h2><pre class="tx-json">{}</pre>"#, escape(tx_json));
    }
    layout("Decode Raw Transaction", messages, &body)
}
