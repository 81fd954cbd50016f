//! Writing `.ts` documents.

use crate::catalogue::Catalogue;
use crate::model::{Attribute, Context, Extra, Message, Translation, TranslationBody, length_variants};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

type XmlWriter = Writer<Vec<u8>>;

pub(crate) fn write(catalogue: &Catalogue) -> Result<String, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped("TS")))?;

    let mut root = BytesStart::new("TS");
    if let Some(version) = catalogue.version() {
        root.push_attribute(("version", version));
    }
    if let Some(source_language) = catalogue.source_language() {
        root.push_attribute(("sourcelanguage", source_language));
    }
    if let Some(language) = catalogue.language() {
        root.push_attribute(("language", language));
    }
    push_attributes(&mut root, catalogue.attributes());
    writer.write_event(Event::Start(root))?;

    for context in catalogue.contexts() {
        write_context(&mut writer, context)?;
    }
    for extra in catalogue.extra() {
        write_extra(&mut writer, extra)?;
    }

    writer.write_event(Event::End(BytesEnd::new("TS")))?;

    let mut xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

fn write_context(writer: &mut XmlWriter, context: &Context) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("context");
    push_attributes(&mut start, &context.attributes);
    writer.write_event(Event::Start(start))?;
    write_text(writer, BytesStart::new("name"), &context.name)?;
    if let Some(comment) = &context.comment {
        write_text(writer, BytesStart::new("comment"), comment)?;
    }
    for message in &context.messages {
        write_message(writer, message)?;
    }
    writer.write_event(Event::End(BytesEnd::new("context")))?;
    Ok(())
}

fn write_message(writer: &mut XmlWriter, message: &Message) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("message");
    if let Some(id) = &message.id {
        start.push_attribute(("id", id.as_str()));
    }
    if message.numerus {
        start.push_attribute(("numerus", "yes"));
    }
    push_attributes(&mut start, &message.attributes);
    writer.write_event(Event::Start(start))?;

    for location in &message.locations {
        let mut element = BytesStart::new("location");
        if let Some(filename) = &location.filename {
            element.push_attribute(("filename", filename.as_str()));
        }
        if let Some(line) = &location.line {
            element.push_attribute(("line", line.as_str()));
        }
        push_attributes(&mut element, &location.attributes);
        writer.write_event(Event::Empty(element))?;
    }

    write_text(writer, BytesStart::new("source"), &message.source)?;
    let optional = [
        ("oldsource", &message.old_source),
        ("comment", &message.disambiguation),
        ("oldcomment", &message.old_disambiguation),
        ("extracomment", &message.extra_comment),
        ("translatorcomment", &message.translator_comment),
    ];
    for (tag, text) in optional {
        if let Some(text) = text {
            write_text(writer, BytesStart::new(tag), text)?;
        }
    }

    write_translation(writer, &message.translation)?;
    for extra in &message.extra {
        write_extra(writer, extra)?;
    }

    writer.write_event(Event::End(BytesEnd::new("message")))?;
    Ok(())
}

fn write_translation(
    writer: &mut XmlWriter,
    translation: &Translation,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("translation");
    if let Some(state) = translation.state.attribute() {
        start.push_attribute(("type", state));
    }

    if let TranslationBody::Text(text) = &translation.body {
        mark_variants(&mut start, text);
    }
    push_attributes(&mut start, &translation.attributes);

    match &translation.body {
        TranslationBody::Numerus(forms) if !forms.is_empty() => {
            writer.write_event(Event::Start(start))?;
            for form in forms {
                let mut element = BytesStart::new("numerusform");
                mark_variants(&mut element, form);
                write_form(writer, element, form)?;
            }
            writer.write_event(Event::End(BytesEnd::new("translation")))?;
        },
        TranslationBody::Numerus(_) => write_text(writer, start, "")?,
        TranslationBody::Text(text) => write_form(writer, start, text)?,
    }
    Ok(())
}

fn mark_variants(start: &mut BytesStart<'_>, form: &str) {
    if length_variants(form).is_some() {
        start.push_attribute(("variants", "yes"));
    }
}

/// Writes one translated form, expanding length variants into
/// `<lengthvariant>` children.
fn write_form(
    writer: &mut XmlWriter,
    start: BytesStart<'_>,
    form: &str,
) -> Result<(), quick_xml::Error> {
    let Some(variants) = length_variants(form) else {
        return write_text(writer, start, form);
    };
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    for variant in variants {
        write_text(writer, BytesStart::new("lengthvariant"), variant)?;
    }
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn push_attributes(start: &mut BytesStart<'_>, attributes: &[Attribute]) {
    for attribute in attributes {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }
}

fn write_extra(writer: &mut XmlWriter, extra: &Extra) -> Result<(), quick_xml::Error> {
    write_text(writer, BytesStart::new(extra.name.as_str()), &extra.content)
}

/// Writes `<tag>text</tag>` on one line so the indenter never adds
/// whitespace inside the element.
fn write_text(
    writer: &mut XmlWriter,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), quick_xml::Error> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;

    let mut run = 0;
    for (at, ch) in text.char_indices() {
        if needs_byte_element(ch) {
            writer.write_event(Event::Text(BytesText::new(&text[run..at])))?;
            let mut byte = BytesStart::new("byte");
            byte.push_attribute(("value", format!("x{:x}", u32::from(ch)).as_str()));
            writer.write_event(Event::Empty(byte))?;
            run = at + ch.len_utf8();
        }
    }
    writer.write_event(Event::Text(BytesText::new(&text[run..])))?;

    writer.write_event(Event::End(end))?;
    Ok(())
}

fn needs_byte_element(ch: char) -> bool {
    ch < '\u{20}' && !matches!(ch, '\t' | '\n' | '\r')
}
