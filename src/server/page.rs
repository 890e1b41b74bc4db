use std::fmt::Write;

use crate::error::{ ChatTransportError, PredictionError };
use crate::models::chat::{ ChatMessage, Role };
use crate::models::prediction::{ PlayerPosition, PredictForm, TransferWindow, AGE_RANGE, SEASON_RANGE };
use crate::predictor::format_currency;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background-color: #f7f9fc; margin: 0; }
.block-container { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
.tabs { display: flex; gap: 1rem; border-bottom: 1px solid #d0d7e2; margin-bottom: 1.5rem; }
.tabs a { padding: .5rem 1rem; text-decoration: none; color: #333; }
.tabs a.active { border-bottom: 3px solid #0057e7; font-weight: bold; }
.info { background: #e8f0fe; padding: .75rem 1rem; border-radius: 6px; }
.success { background: #e6f4ea; padding: .75rem 1rem; border-radius: 6px; }
.error { background: #fdecea; padding: .75rem 1rem; border-radius: 6px; white-space: pre-wrap; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.columns label { display: block; margin: .75rem 0; }
input[type=text], input[type=number], select { width: 100%; padding: .4rem; background-color: #ffffff; }
button { background-color: #0057e7; color: white; font-weight: bold; border: 0; padding: .6rem 1.2rem; border-radius: 6px; cursor: pointer; }
.chat { display: flex; flex-direction: column; gap: .5rem; margin: 1rem 0; max-height: 60vh; overflow-y: auto; }
.message { padding: .6rem 1rem; border-radius: 6px; white-space: pre-wrap; }
.message.user { background: #ffffff; }
.message.assistant { background: #eef3fb; }
.chat-input { display: flex; gap: .5rem; }
.chat-input input { flex: 1; }
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Predictor,
    Chat,
}

impl Tab {
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("chat") => Tab::Chat,
            _ => Tab::Predictor,
        }
    }
}

/// Everything one render of the page needs.
pub struct PageView<'a> {
    pub tab: Tab,
    pub form: &'a PredictForm,
    pub prediction: Option<&'a Result<f64, PredictionError>>,
    pub history: &'a [ChatMessage],
    pub chat_error: Option<&'a ChatTransportError>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>⚽ Football Assistant</title>\n");
    let _ = write!(html, "<style>{}</style>\n</head>\n<body>\n<div class=\"block-container\">\n", STYLE);
    html.push_str("<h2>⚽ Football Assistant</h2>\n");
    html.push_str(
        "<p>Welcome to your all-in-one football assistant website! Use the tabs below to predict transfer fees or chat with an AI football expert.</p>\n"
    );

    let active = |tab: Tab| if view.tab == tab { " class=\"active\"" } else { "" };
    let _ = write!(
        html,
        "<nav class=\"tabs\"><a href=\"/?tab=predictor\"{}>💰 Predict Transfer Fees</a><a href=\"/?tab=chat\"{}>💬 Football Chatbot</a></nav>\n",
        active(Tab::Predictor),
        active(Tab::Chat)
    );

    match view.tab {
        Tab::Predictor => render_predictor(&mut html, view),
        Tab::Chat => render_chat(&mut html, view),
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_predictor(html: &mut String, view: &PageView<'_>) {
    let form = view.form;
    html.push_str("<section id=\"predictor\">\n<h3>📊 Transfer Fee Predictor</h3>\n");
    html.push_str(
        "<p class=\"info\">Fill in the details of the player to estimate their transfer market value.</p>\n"
    );
    html.push_str("<form method=\"post\" action=\"/predict\">\n<div class=\"columns\">\n<div>\n");

    let _ = write!(
        html,
        "<label>📅 Season<input type=\"number\" name=\"season\" min=\"{}\" max=\"{}\" value=\"{}\"></label>\n",
        SEASON_RANGE.start(),
        SEASON_RANGE.end(),
        escape_html(&form.season)
    );
    let windows: Vec<&str> = TransferWindow::ALL.iter().map(|w| w.as_str()).collect();
    render_select(html, "🪟 Transfer Window", "window", &windows, &form.window);
    let _ = write!(
        html,
        "<label>🎂 Player Age<input type=\"range\" name=\"player_age\" min=\"{}\" max=\"{}\" value=\"{}\" oninput=\"this.nextElementSibling.value=this.value\"><output>{}</output></label>\n",
        AGE_RANGE.start(),
        AGE_RANGE.end(),
        escape_html(&form.player_age),
        escape_html(&form.player_age)
    );
    let positions: Vec<&str> = PlayerPosition::ALL.iter().map(|p| p.as_str()).collect();
    render_select(html, "🧭 Player Position", "player_pos", &positions, &form.player_pos);

    html.push_str("</div>\n<div>\n");
    let _ = write!(
        html,
        "<label>🏳️ Player Nation<input type=\"text\" name=\"player_nation\" value=\"{}\"></label>\n",
        escape_html(&form.player_nation)
    );
    let _ = write!(
        html,
        "<label>💸 Market Value (€)<input type=\"number\" name=\"market_val_amnt\" value=\"{}\"></label>\n",
        escape_html(&form.market_val_amnt)
    );
    for (name, label) in [
        ("is_free", "🆓 Free Transfer?"),
        ("is_loan", "🔄 Is Loan?"),
        ("is_loan_end", "🏁 Is Loan End?"),
        ("is_retired", "⚰️ Is Retired?"),
    ] {
        let checked = if form.is_checked(name) { " checked" } else { "" };
        let _ = write!(html, "<label><input type=\"checkbox\" name=\"{}\"{}> {}</label>\n", name, checked, label);
    }
    html.push_str("</div>\n</div>\n<button type=\"submit\">🚀 Predict Transfer Fee</button>\n</form>\n");

    match view.prediction {
        Some(Ok(estimate)) => {
            let _ = write!(
                html,
                "<p class=\"success\">🎯 Estimated Transfer Fee: <strong>{}</strong></p>\n",
                format_currency(*estimate)
            );
        }
        Some(Err(e)) => {
            let _ = write!(html, "<p class=\"error\">❌ Prediction failed: {}</p>\n", escape_html(&e.to_string()));
        }
        None => {}
    }
    html.push_str("</section>\n");
}

fn render_select(html: &mut String, label: &str, name: &str, options: &[&str], selected: &str) {
    let _ = write!(html, "<label>{}<select name=\"{}\">", label, name);
    for option in options {
        let mark = if *option == selected { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{0}\"{1}>{0}</option>", option, mark);
    }
    html.push_str("</select></label>\n");
}

fn render_chat(html: &mut String, view: &PageView<'_>) {
    html.push_str("<section id=\"chat\">\n<h3>🤖 Football Chatbot</h3>\n");
    html.push_str(
        "<p class=\"info\">Ask anything about football: stats, players, transfers, clubs, and history!</p>\n"
    );

    html.push_str("<div class=\"chat\">\n");
    for message in view.history {
        let icon = match message.role {
            Role::User => "🧑",
            Role::Assistant => "🤖",
            Role::System => "⚙️",
        };
        let _ = write!(
            html,
            "<div class=\"message {}\">{} {}</div>\n",
            message.role,
            icon,
            escape_html(&message.content)
        );
    }
    html.push_str("</div>\n");

    if let Some(e) = view.chat_error {
        let _ = write!(
            html,
            "<p class=\"error\">❌ Error communicating with Ollama:\n{}</p>\n",
            escape_html(&e.to_string())
        );
    }

    html.push_str(
        "<form method=\"post\" action=\"/chat\" class=\"chat-input\"><input type=\"text\" name=\"message\" placeholder=\"Ask a football-related question...\" autofocus><button type=\"submit\">Send</button></form>\n"
    );
    html.push_str("</section>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(
        tab: Tab,
        form: &'a PredictForm,
        prediction: Option<&'a Result<f64, PredictionError>>,
        history: &'a [ChatMessage]
    ) -> PageView<'a> {
        PageView { tab, form, prediction, history, chat_error: None }
    }

    #[test]
    fn renders_estimate_with_currency_format() {
        let form = PredictForm::default();
        let result = Ok(15_000_000.0);
        let html = render(&view(Tab::Predictor, &form, Some(&result), &[]));
        assert!(html.contains("🎯 Estimated Transfer Fee: <strong>€15,000,000.00</strong>"));
    }

    #[test]
    fn renders_prediction_error_inline() {
        let form = PredictForm::default();
        let result = Err(PredictionError::ModelUnavailable("file not found".into()));
        let html = render(&view(Tab::Predictor, &form, Some(&result), &[]));
        assert!(html.contains("❌ Prediction failed: Model is not loaded: file not found"));
    }

    #[test]
    fn echoes_form_values_and_selection() {
        let form = PredictForm {
            player_pos: "MF".into(),
            window: "Winter".into(),
            is_retired: Some("on".into()),
            ..PredictForm::default()
        };
        let html = render(&view(Tab::Predictor, &form, None, &[]));
        assert!(html.contains("<option value=\"MF\" selected>MF</option>"));
        assert!(html.contains("<option value=\"Winter\" selected>Winter</option>"));
        assert!(html.contains("name=\"is_retired\" checked"));
        assert!(html.contains("value=\"Germany\""));
    }

    #[test]
    fn chat_tab_skips_system_message_and_escapes_content() {
        let form = PredictForm::default();
        let history = [ChatMessage::user("<b>Who</b> won?"), ChatMessage::assistant("Germany")];
        let html = render(&view(Tab::Chat, &form, None, &history));
        assert!(html.contains("&lt;b&gt;Who&lt;/b&gt; won?"));
        assert!(html.contains("<div class=\"message assistant\">🤖 Germany</div>"));
        assert!(!html.contains("action=\"/predict\""));
    }

    #[test]
    fn chat_error_is_shown() {
        let form = PredictForm::default();
        let error = ChatTransportError::Status { url: "http://localhost:11434/api/chat".into(), status: 500 };
        let page = PageView {
            tab: Tab::Chat,
            form: &form,
            prediction: None,
            history: &[],
            chat_error: Some(&error),
        };
        let html = render(&page);
        assert!(html.contains("❌ Error communicating with Ollama:\nhttp://localhost:11434/api/chat returned HTTP 500"));
    }

    #[test]
    fn tab_query_defaults_to_predictor() {
        assert_eq!(Tab::from_query(None), Tab::Predictor);
        assert_eq!(Tab::from_query(Some("chat")), Tab::Chat);
        assert_eq!(Tab::from_query(Some("bogus")), Tab::Predictor);
    }
}
