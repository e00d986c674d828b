//! HTML pages served at `/`.

use std::fmt::Write as _;

use poi_map_map::escape::escape_html;
use poi_map_server_models::{ADDRESS_FIELD, CATEGORY_FIELD, MUNICIPALITY_FIELD};

const PAGE_STYLE: &str = r"
body { font-family: sans-serif; margin: 0; padding: 0; }
header { background: #1f3b5a; color: #fff; padding: 12px 20px; }
form { display: flex; flex-wrap: wrap; gap: 12px; padding: 16px 20px; align-items: flex-end; }
label { display: flex; flex-direction: column; font-size: 0.9em; }
input, select { padding: 6px; min-width: 200px; }
.error { color: #b00020; padding: 0 20px; font-weight: bold; }
.map-container { height: calc(100vh - 160px); padding: 0 20px 20px; }
";

/// The search form page, optionally with an error message.
#[must_use]
pub fn form_page(categories: &[String], municipalities: &[String], error: Option<&str>) -> String {
    let error = error.map_or_else(String::new, |message| {
        format!("<p class=\"error\">{}</p>\n", escape_html(message))
    });
    layout(&search_form(categories, municipalities), &error)
}

/// The result page: the search form followed by the rendered map fragment.
#[must_use]
pub fn map_page(map_html: &str, categories: &[String], municipalities: &[String]) -> String {
    let body = format!(
        "{}<div class=\"map-container\">\n{map_html}</div>\n",
        search_form(categories, municipalities)
    );
    layout(&body, "")
}

fn layout(body: &str, error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="nl">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>Kaartapplicatie</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<header><h1>Kaartapplicatie</h1></header>
{error}{body}</body>
</html>
"#
    )
}

fn search_form(categories: &[String], municipalities: &[String]) -> String {
    format!(
        r#"<form method="post" action="/">
<label>Adres
<input type="text" name="{ADDRESS_FIELD}" placeholder="Straat huisnummer, gemeente"/>
</label>
<label>Categorie
<select name="{CATEGORY_FIELD}">
{category_options}</select>
</label>
<label>Gemeente
<select name="{MUNICIPALITY_FIELD}">
{municipality_options}</select>
</label>
<button type="submit">Toon kaart</button>
</form>
"#,
        category_options = options(categories),
        municipality_options = options(municipalities),
    )
}

fn options(values: &[String]) -> String {
    values.iter().fold(String::new(), |mut html, value| {
        let value = escape_html(value);
        let _ = writeln!(html, "<option value=\"{value}\">{value}</option>");
        html
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn form_lists_every_option() {
        let html = form_page(
            &strings(&["Basis", "Secundair"]),
            &strings(&["Gent", "Aalst"]),
            None,
        );
        assert!(html.contains("<option value=\"Basis\">Basis</option>"));
        assert!(html.contains("<option value=\"Secundair\">Secundair</option>"));
        assert!(html.contains("<option value=\"Gent\">Gent</option>"));
        assert!(html.contains("<option value=\"Aalst\">Aalst</option>"));
        assert!(html.contains("name=\"input_address\""));
        assert!(html.contains("name=\"tags-level\""));
        assert!(html.contains("name=\"input_gemeente\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn blank_address_can_be_submitted() {
        let html = form_page(&[], &[], None);
        let input = html
            .lines()
            .find(|line| line.contains("name=\"input_address\""))
            .unwrap();
        assert!(!input.contains("required"));
    }

    #[test]
    fn options_keep_dataset_order() {
        let html = form_page(&strings(&["Zeta", "Alfa"]), &[], None);
        let zeta = html.find("Zeta").unwrap();
        let alfa = html.find("Alfa").unwrap();
        assert!(zeta < alfa);
    }

    #[test]
    fn form_shows_error() {
        let html = form_page(&[], &[], Some("Geocoding mislukt. Controleer het adres."));
        assert!(html.contains("<p class=\"error\">Geocoding mislukt. Controleer het adres.</p>"));
    }

    #[test]
    fn option_values_are_escaped() {
        let html = form_page(&strings(&["<b>\"x\"</b>"]), &[], None);
        assert!(!html.contains("<b>\"x\"</b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn map_page_embeds_fragment() {
        let html = map_page("<div id=\"map_x\"></div>", &strings(&["Basis"]), &[]);
        assert!(html.contains("<div id=\"map_x\"></div>"));
        assert!(html.contains("<option value=\"Basis\">Basis</option>"));
    }
}
