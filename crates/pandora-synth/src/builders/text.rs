//! Text-based bodies: HTML, plain text, JSON, CSV, CSS, JavaScript.

use serde_json::{json, Value};

use super::{paragraphs, strip_code_fence, xml_escape};
use crate::faker::{capitalize, Faker};

pub(super) fn html(fake: &mut Faker, text: Option<&str>) -> String {
    if let Some(t) = text {
        let page = strip_code_fence(t);
        if page.to_ascii_lowercase().contains("<html") {
            return page.to_string();
        }
    }

    let (title, sections) = match text.map(paragraphs) {
        Some(mut paras) if !paras.is_empty() => {
            let title = if paras.len() > 1 {
                paras.remove(0)
            } else {
                fake.title()
            };
            (title, paras)
        }
        _ => {
            let title = fake.title();
            let n = fake.range(1, 12);
            let sections = (0..n)
                .map(|_| {
                    let sentences = fake.range(2, 14);
                    fake.paragraph(sentences)
                })
                .collect();
            (title, sections)
        }
    };

    let mut body = String::new();
    for para in &sections {
        if fake.chance(45) {
            let heading = fake.sentence(3, 7);
            body.push_str(&format!(
                "    <h3>{}</h3>\n",
                xml_escape(heading.trim_end_matches('.'))
            ));
        }
        body.push_str(&format!("    <p>{}</p>\n", xml_escape(para)));
        if fake.chance(15) {
            let word = fake.word();
            let h = fake.range(80, 200);
            let w = fake.range(200, 400);
            body.push_str(&format!("    <img src=\"/images/{word}.png?h={h}&amp;w={w}\"/>\n"));
        }
    }

    let script = fake.uuid();
    let css_dir = fake.uuid();
    let css_name = fake.word();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <script type=\"text/javascript\" src=\"/scripts/{script}.js\"></script>\n    \
         <link rel=\"stylesheet\" href=\"/css/{css_dir}/{css_name}.css\" type=\"text/css\" />\n    \
         <title>{}</title>\n</head>\n<body>\n    <h1>{}</h1>\n{body}</body>\n</html>\n",
        xml_escape(&title),
        xml_escape(&title),
    )
}

pub(super) fn plain(fake: &mut Faker, text: Option<&str>) -> String {
    match text {
        Some(t) => t.to_string(),
        None => {
            let n = fake.range(1, 6);
            (0..n)
                .map(|_| {
                    let sentences = fake.range(1, 13);
                    fake.paragraph(sentences)
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        }
    }
}

pub(super) fn json(fake: &mut Faker, text: Option<&str>) -> String {
    let value = match text {
        Some(t) => match serde_json::from_str::<Value>(strip_code_fence(t)) {
            Ok(v) => v,
            Err(_) => Value::Array(
                paragraphs(t)
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| json!({ "section": i + 1, "text": p }))
                    .collect(),
            ),
        },
        None => synthetic_rows(fake),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn synthetic_rows(fake: &mut Faker) -> Value {
    let n = fake.range(1, 100);
    let rows = (1..=n)
        .map(|id| {
            json!({
                "id": id,
                "name": fake.name(),
                "email": fake.email(),
                "address": fake.address(),
                "department": capitalize(fake.word()),
                "title": fake.catch_phrase(),
                "created": fake.date(),
                "amount": fake.range(100, 250_000),
                "active": fake.chance(70),
                "reference": fake.uuid(),
            })
        })
        .collect();
    Value::Array(rows)
}

pub(super) fn csv(fake: &mut Faker, text: Option<&str>) -> String {
    if let Some(t) = text {
        let body = strip_code_fence(t);
        if body.lines().filter(|l| l.contains(',')).count() >= 2 {
            return format!("{body}\n");
        }
    }

    let mut out = String::from("id,Name,Address,Password\n");
    let n = fake.range(1, 100);
    for id in 1..=n {
        let fields = [fake.name(), fake.address(), fake.password()];
        let quoted: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&format!("{id},{}\n", quoted.join(",")));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub(super) fn stylesheet(fake: &mut Faker, text: Option<&str>) -> String {
    if let Some(t) = text {
        let css = strip_code_fence(t);
        if css.contains('{') {
            return format!("{css}\n");
        }
    }

    let mut out = format!(
        "* {{ font-family: \"{}\"; }}\nh1 {{ font-family: \"{}\"; color: {}; }}\nbody {{ width: {}%; background: {}; }}\n",
        fake.font(),
        fake.font(),
        fake.hex_color(),
        fake.range(65, 100),
        fake.hex_color(),
    );
    for _ in 0..fake.range(2, 8) {
        out.push_str(&format!(
            ".{}-{} {{ margin: {}px; padding: {}px; color: {}; }}\n",
            fake.word(),
            fake.word(),
            fake.range(0, 32),
            fake.range(0, 24),
            fake.hex_color(),
        ));
    }
    out
}

pub(super) fn script(fake: &mut Faker, text: Option<&str>) -> String {
    if let Some(t) = text {
        return format!("{}\n", strip_code_fence(t));
    }

    let name = fake.word();
    let mut out = format!("function {name}Init(config) {{\n");
    for _ in 0..fake.range(1, 6) {
        out.push_str(&format!("  console.log('{}, /{}');\n", fake.word(), fake.date()));
    }
    out.push_str(&format!(
        "  return {{ id: '{}', retries: {} }};\n}}\n\n{name}Init({{}});\n",
        fake.uuid(),
        fake.range(1, 5)
    ));
    out
}
