/// Page shell. `{{title}}`, `{{page}}`, `{{nav}}` and `{{body}}` are filled
/// server side; the script then keeps containers and notices current.
pub const PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Chainwatch | {{title}}</title>
  <style>
    :root {
      --bg: #eef1f4;
      --ink: #16191d;
      --card: #ffffff;
      --line: #22272e;
      --accent: #1f6fd4;
      --ok: #2b8a3e;
      --warn: #a35b00;
      --bad: #c92a2a;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      font-family: "IBM Plex Mono", "Fira Code", "JetBrains Mono", monospace;
      background: var(--bg);
      color: var(--ink);
    }
    .wrap { max-width: 1280px; margin: 0 auto; padding: 20px; }
    .head {
      display: flex;
      align-items: center;
      justify-content: space-between;
      border: 3px solid var(--line);
      background: var(--card);
      box-shadow: 6px 6px 0 var(--line);
      padding: 12px 16px;
      margin-bottom: 18px;
    }
    h1 { margin: 0; font-size: 20px; letter-spacing: 1px; text-transform: uppercase; }
    nav a { margin-left: 14px; color: var(--ink); text-decoration: none; }
    nav a.active { color: var(--accent); font-weight: 700; }
    .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 14px; }
    .card {
      border: 3px solid var(--line);
      background: var(--card);
      box-shadow: 6px 6px 0 var(--line);
      padding: 12px;
    }
    .card.wide { grid-column: 1 / -1; }
    h2 { margin: 0 0 10px; font-size: 15px; text-transform: uppercase; }
    table { width: 100%; border-collapse: collapse; font-size: 13px; }
    th, td { border-bottom: 1px solid #d0d5db; padding: 4px 6px; text-align: left; }
    td.placeholder { color: #68707a; text-align: center; font-style: italic; }
    .box div { padding: 2px 0; }
    .log { max-height: 480px; overflow-y: auto; font-size: 12px; }
    .attack-success { color: var(--bad); font-weight: 700; }
    .attack-armed { color: var(--warn); }
    .rejected { color: var(--warn); font-style: italic; }
    .row { display: flex; gap: 8px; margin-bottom: 8px; }
    input { flex: 1; padding: 6px; border: 2px solid var(--line); font: inherit; }
    button {
      border: 2px solid var(--line);
      background: var(--accent);
      color: #fff;
      padding: 6px 12px;
      font: inherit;
      cursor: pointer;
    }
    button.danger { background: var(--bad); }
    #notices { position: fixed; top: 16px; right: 16px; width: 340px; z-index: 10; }
    .notice {
      border: 3px solid var(--line);
      background: var(--card);
      box-shadow: 4px 4px 0 var(--line);
      padding: 10px;
      margin-bottom: 10px;
      white-space: pre-line;
    }
    .notice.blocking { border-color: var(--bad); }
  </style>
</head>
<body>
  <div id="notices"></div>
  <div class="wrap">
    <div class="head">
      <h1>Chainwatch / {{title}}</h1>
      <nav>{{nav}}</nav>
    </div>
    <div class="grid">
{{body}}
    </div>
  </div>
  <script>
    const PAGE = "{{page}}";

    async function post(url, body) {
      const res = await fetch(url, {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(body || {})
      });
      return res.json();
    }
    async function refreshViews() {
      try {
        const res = await fetch(`/api/views/${PAGE}`);
        const data = await res.json();
        if (!data.ok) return;
        for (const [name, html] of Object.entries(data.html)) {
          const el = document.getElementById(name);
          if (el) el.innerHTML = html;
        }
      } catch (_) {}
    }
    async function refreshNotices() {
      try {
        const res = await fetch("/api/notices");
        const data = await res.json();
        const box = document.getElementById("notices");
        box.innerHTML = "";
        for (const n of data.notices || []) {
          const el = document.createElement("div");
          el.className = `notice ${n.kind}`;
          el.textContent = n.message;
          if (n.kind === "blocking") {
            const ok = document.createElement("button");
            ok.textContent = "OK";
            ok.onclick = dismissNotices;
            el.appendChild(document.createElement("br"));
            el.appendChild(ok);
          }
          box.appendChild(el);
        }
      } catch (_) {}
    }
    async function dismissNotices() {
      await post("/notices/dismiss");
      refreshNotices();
    }
    async function submitTx() {
      const ids = ["sender", "receiver", "amount", "nonce"];
      const form = {};
      for (const id of ids) form[id] = document.getElementById(id).value;
      const data = await post("/actions/tx", form);
      if (data.outcome === "accepted") {
        for (const id of ids) document.getElementById(id).value = "";
      }
      refreshNotices();
    }
    async function mineBlock() {
      await post("/actions/mine");
      refreshNotices();
    }
    async function runAttack() {
      await post("/actions/attack");
      refreshNotices();
    }
    setInterval(refreshViews, 1000);
    setInterval(refreshNotices, 1000);
    refreshNotices();
  </script>
</body>
</html>"##;

pub const MINE_CONTROLS_HTML: &str = r#"      <div class="card">
        <h2>Mining</h2>
        <button onclick="mineBlock()">Mine Block</button>
      </div>"#;

pub const ATTACK_CONTROLS_HTML: &str = r#"      <div class="card">
        <h2>Attack</h2>
        <button class="danger" onclick="runAttack()">Run Attack</button>
      </div>"#;

/// `{{sender}}`, `{{receiver}}`, `{{amount}}` and `{{nonce}}` hold the last
/// kept form values, already escaped.
pub const TX_FORM_HTML: &str = r#"      <div class="card">
        <h2>New Transaction</h2>
        <div class="row"><input id="sender" placeholder="sender" value="{{sender}}"/></div>
        <div class="row"><input id="receiver" placeholder="receiver" value="{{receiver}}"/></div>
        <div class="row">
          <input id="amount" placeholder="amount" value="{{amount}}"/>
          <input id="nonce" placeholder="nonce" value="{{nonce}}"/>
        </div>
        <button onclick="submitTx()">Send</button>
      </div>"#;
