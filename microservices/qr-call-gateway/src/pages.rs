//! HTML pages served to people scanning a code

use qrcall_core::CallIntent;

use crate::dispatcher::DispatchOutcome;

const STYLE: &str = "body{font-family:Arial,sans-serif;max-width:420px;margin:50px auto;padding:20px;background:#f5f5f5}\
.container{background:#fff;padding:30px;border-radius:10px;box-shadow:0 2px 10px rgba(0,0,0,.1);text-align:center}\
input{width:100%;padding:12px;font-size:16px;border:1px solid #ddd;border-radius:5px;box-sizing:border-box;margin:8px 0}\
button,.btn{display:inline-block;width:100%;padding:14px;font-size:18px;background:#007bff;color:#fff;border:none;border-radius:5px;text-decoration:none;cursor:pointer;box-sizing:border-box}\
.success{color:#28a745}.error{color:#dc3545}.muted{color:#666;font-size:13px;word-break:break-all}\
img{max-width:100%}";

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><style>{}</style></head>\
<body><div class=\"container\">{}</div></body></html>",
        escape_html(title),
        STYLE,
        body
    )
}

const HOME_LINK: &str = "<p><a href=\"/\" class=\"btn\">Generate another QR code</a></p>";

/// Landing page with the generate form
pub fn index() -> String {
    let body = "<h2>QR Call Link</h2>\
<form id=\"generate\">\
<input type=\"tel\" name=\"phoneNumber\" placeholder=\"+1234567890\" required>\
<input type=\"text\" name=\"label\" placeholder=\"Label (optional)\" maxlength=\"100\">\
<button type=\"submit\">Generate QR code</button></form>\
<div id=\"result\"></div>\
<script>\
document.getElementById('generate').addEventListener('submit',async e=>{\
e.preventDefault();const f=new FormData(e.target);const out=document.getElementById('result');\
const r=await fetch('/generate-qr',{method:'POST',headers:{'Content-Type':'application/json'},\
body:JSON.stringify({phoneNumber:f.get('phoneNumber'),label:f.get('label')})});\
const d=await r.json();out.textContent='';\
if(!d.success){out.textContent=d.error;return;}\
const img=document.createElement('img');img.src=d.qrCode;img.alt='QR code';out.appendChild(img);\
const p=document.createElement('p');p.className='muted';p.textContent=d.label+': '+d.callUrl;out.appendChild(p);});\
</script>";
    layout("QR Call Link", body)
}

/// Ask the scanner for their own number
pub fn caller_prompt(token: &str, intent: &CallIntent, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape_html(e)))
        .unwrap_or_default();
    let body = format!(
        "<h3>Calling: {label}</h3>{error}\
<form action=\"/api/call\" method=\"get\">\
<input type=\"hidden\" name=\"callId\" value=\"{token}\">\
<label>Your phone number:</label>\
<input type=\"tel\" name=\"from\" placeholder=\"+1234567890\" required>\
<button type=\"submit\">Make call</button></form>\
<p class=\"muted\">QR code ID: {token}</p>",
        label = escape_html(&intent.label),
        error = error,
        token = escape_html(token),
    );
    layout("Make Call", &body)
}

/// Page for a terminal dispatch outcome
pub fn dispatched(intent: &CallIntent, from: &str, outcome: &DispatchOutcome) -> String {
    let label = escape_html(&intent.label);
    let from = escape_html(from);

    match outcome {
        DispatchOutcome::Simulated { to, .. } => layout(
            "Call Demo",
            &format!(
                "<h2 class=\"success\">Demo mode: the call would work</h2>\
<p>Would call <strong>{label}</strong></p>\
<p>From: <strong>{from}</strong></p>\
<p>To: <strong>{to}</strong></p>\
<p class=\"muted\">Configure telephony credentials to enable real calls</p>{home}",
                label = label,
                from = from,
                to = escape_html(to),
                home = HOME_LINK,
            ),
        ),
        DispatchOutcome::Connected { call_sid, status } => layout(
            "Call Initiated",
            &format!(
                "<h2 class=\"success\">Call initiated</h2>\
<p>Calling <strong>{label}</strong></p>\
<p>You should receive a call shortly on <strong>{from}</strong></p>\
<p class=\"muted\">Call ID: {sid}</p><p class=\"muted\">Status: {status}</p>{home}",
                label = label,
                from = from,
                sid = escape_html(call_sid),
                status = escape_html(status),
                home = HOME_LINK,
            ),
        ),
        DispatchOutcome::Failed { error } => layout(
            "Call Failed",
            &format!(
                "<h2 class=\"error\">Call failed</h2>\
<p>Unable to initiate call to <strong>{label}</strong></p>\
<p class=\"muted\">Error: {error}</p>\
<p><a href=\"/\" class=\"btn\">Try again</a></p>",
                label = label,
                error = escape_html(error),
            ),
        ),
    }
}

/// Token could not be decoded
pub fn invalid_code(reason: &str) -> String {
    layout(
        "Invalid Code",
        &format!(
            "<h2 class=\"error\">Invalid QR code</h2>\
<p>This call link is damaged or was not issued by this service.</p>\
<p class=\"muted\">{}</p>{}",
            escape_html(reason),
            HOME_LINK
        ),
    )
}

/// Catch-all failure page
pub fn internal_error() -> String {
    layout(
        "Error",
        "<h2 class=\"error\">Error</h2><p>Something went wrong. Please try again.</p>\
<p><a href=\"/\" class=\"btn\">Go back</a></p>",
    )
}
