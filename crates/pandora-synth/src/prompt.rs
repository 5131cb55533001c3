//! Instructions for the primary tier.
//!
//! The topic comes from the requested file name (`quarterly_budget.docx`
//! becomes "quarterly budget"). Without a usable name the model is asked to
//! pick its own subject. Every instruction asks for the bare content only,
//! since anything the model adds around it ends up in the served file.

use pandora_core::{BodyKind, ContentIdentity};

/// The prompt for `kind`, or `None` for kinds the model cannot write.
pub fn instruction(kind: BodyKind, identity: &ContentIdentity, rows: usize) -> Option<String> {
    let topic = identity.topic();
    let about = match &topic {
        Some(t) => format!("the topic '{t}'"),
        None => "a topic of your choosing".to_string(),
    };
    let titled = match &topic {
        Some(t) => format!("titled '{t}'"),
        None => "with a title of your choosing".to_string(),
    };

    let prompt = match kind {
        BodyKind::Html => format!(
            "Write a complete HTML web page about {about}. Include a title, headings and \
             several paragraphs. Return only the HTML document."
        ),
        BodyKind::Text => format!(
            "Create a document {titled} with several paragraphs on {about}. Only return the \
             contents of the document and not any other content."
        ),
        BodyKind::Json => format!(
            "Produce a valid JSON array with at least {rows} rows and at least 10 columns \
             about {about}. No additional text or formatting."
        ),
        BodyKind::Csv => format!(
            "Produce CSV data with a header row and at least {rows} rows about {about}. \
             Return only the CSV."
        ),
        BodyKind::Stylesheet => format!(
            "Give me a CSS stylesheet for a web site about {about}. Just the CSS, without any \
             quotes around it."
        ),
        BodyKind::Script => format!(
            "Give me a javascript script for a web site about {about} without any quotes \
             around it. Just the code."
        ),
        BodyKind::Document => format!(
            "Write a business document {titled}. Put the title on the first line, then several \
             paragraphs separated by blank lines. Only return the document text."
        ),
        BodyKind::Spreadsheet => format!(
            "Produce a table of at least {rows} rows about {about} as comma-separated values \
             with a header row. Return only the table."
        ),
        BodyKind::Presentation => format!(
            "Write the content for a short slide presentation {titled}. Put the presentation \
             title on the first line, then one paragraph per slide separated by blank lines, \
             each starting with a short heading sentence. Only return the slide text."
        ),
        BodyKind::Pdf => format!(
            "Provide a few paragraphs about {about}. Put a title on the first line. This should \
             be a text only response."
        ),
        BodyKind::Image
        | BodyKind::OneNote
        | BodyKind::Zip
        | BodyKind::Tar
        | BodyKind::Binary
        | BodyKind::Audio
        | BodyKind::Video => return None,
    };
    Some(prompt)
}
