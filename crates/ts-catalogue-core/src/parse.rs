//! Reading `.ts` documents.

use crate::catalogue::{Catalogue, LoadOptions};
use crate::error::MalformedCatalogue;
use crate::model::{
    Attribute, Context, Extra, LENGTH_VARIANT_SEPARATOR, Location, Message, Translation,
    TranslationBody,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};
use std::fmt::Display;

pub(crate) fn parse(xml: &str, options: LoadOptions) -> Result<Catalogue, MalformedCatalogue> {
    let mut parser = Parser::new(xml, options.allow_missing_source);
    loop {
        match parser.next()? {
            Event::Start(start) if start.name().as_ref() == b"TS" => {
                let header = parser.header(&start)?;
                let body = parser.ts_body()?;
                return parser.finish(header.build(body, options));
            },
            Event::Empty(start) if start.name().as_ref() == b"TS" => {
                let header = parser.header(&start)?;
                return parser.finish(header.build(TsBody::default(), options));
            },
            Event::Start(start) | Event::Empty(start) => {
                return Err(parser.unexpected_element(&start, "document"));
            },
            Event::Text(text) if is_blank(&text) => {},
            Event::Text(_) | Event::CData(_) => return Err(parser.unexpected_text("document")),
            Event::Eof => return Err(MalformedCatalogue::MissingRoot),
            _ => {},
        }
    }
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
    allow_missing_source: bool,
    /// Offset of the event most recently returned by [`Parser::next`].
    position: u64,
    comments: usize,
}

struct Header {
    version: Option<String>,
    source_language: Option<String>,
    language: Option<String>,
    attributes: Vec<Attribute>,
}

#[derive(Default)]
struct TsBody {
    contexts: Vec<Context>,
    extra: Vec<Extra>,
}

/// Character data of one translated form, either plain or split into
/// `<lengthvariant>` children.
#[derive(Default)]
struct FormText {
    text: String,
    variants: Vec<String>,
}

impl FormText {
    fn finish(self) -> Option<String> {
        if self.variants.is_empty() {
            Some(self.text)
        } else if self.text.trim().is_empty() {
            let separator = LENGTH_VARIANT_SEPARATOR.to_string();
            Some(self.variants.join(separator.as_str()))
        } else {
            None
        }
    }
}

struct Attributes(Vec<(String, String)>);

impl Attributes {
    fn take(&mut self, key: &str) -> Option<String> {
        let found = self.0.iter().position(|(name, _)| name == key)?;
        Some(self.0.remove(found).1)
    }

    /// Whatever was not taken, in document order.
    fn rest(self) -> Vec<Attribute> {
        self.0
            .into_iter()
            .map(|(name, value)| Attribute { name, value })
            .collect()
    }
}

impl Header {
    fn build(self, body: TsBody, options: LoadOptions) -> Result<Catalogue, MalformedCatalogue> {
        Catalogue::builder()
            .maybe_version(self.version)
            .maybe_source_language(self.source_language)
            .maybe_language(self.language)
            .attributes(self.attributes)
            .contexts(body.contexts)
            .extra(body.extra)
            .options(options)
            .build()
    }
}

impl<'a> Parser<'a> {
    fn new(xml: &'a str, allow_missing_source: bool) -> Self {
        Self {
            reader: Reader::from_str(xml),
            allow_missing_source,
            position: 0,
            comments: 0,
        }
    }

    fn next(&mut self) -> Result<Event<'a>, MalformedCatalogue> {
        self.position = offset(self.reader.buffer_position());
        let event = self.reader.read_event().map_err(|err| MalformedCatalogue::Xml {
            position: offset(self.reader.buffer_position()),
            message: err.to_string(),
        })?;
        if matches!(event, Event::Comment(_)) {
            self.comments += 1;
        }
        Ok(event)
    }

    fn finish(
        &self,
        catalogue: Result<Catalogue, MalformedCatalogue>,
    ) -> Result<Catalogue, MalformedCatalogue> {
        let mut catalogue = catalogue?;
        catalogue.comments = self.comments;
        Ok(catalogue)
    }

    fn xml_error(&self, err: impl Display) -> MalformedCatalogue {
        MalformedCatalogue::Xml {
            position: self.position,
            message: err.to_string(),
        }
    }

    fn unexpected_element(&self, start: &BytesStart<'_>, parent: &str) -> MalformedCatalogue {
        MalformedCatalogue::UnexpectedElement {
            element: element_name(start),
            parent: parent.to_string(),
            position: self.position,
        }
    }

    fn unexpected_text(&self, parent: &str) -> MalformedCatalogue {
        MalformedCatalogue::UnexpectedText {
            parent: parent.to_string(),
            position: self.position,
        }
    }

    fn invalid_attribute(
        &self,
        element: &str,
        attribute: &str,
        value: String,
        position: u64,
    ) -> MalformedCatalogue {
        MalformedCatalogue::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value,
            position,
        }
    }

    fn attributes(&self, start: &BytesStart<'_>) -> Result<Attributes, MalformedCatalogue> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| self.xml_error(err))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|err| self.xml_error(err))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Attributes(attributes))
    }

    /// Elements with no attribute fields in the model must not carry any.
    fn no_other_attributes(
        &self,
        start: &BytesStart<'_>,
        attributes: Attributes,
    ) -> Result<(), MalformedCatalogue> {
        match attributes.0.into_iter().next() {
            None => Ok(()),
            Some((attribute, _)) => Err(MalformedCatalogue::UnexpectedAttribute {
                element: element_name(start),
                attribute,
                position: self.position,
            }),
        }
    }

    fn header(&self, start: &BytesStart<'_>) -> Result<Header, MalformedCatalogue> {
        let mut attributes = self.attributes(start)?;
        Ok(Header {
            version: attributes.take("version"),
            source_language: attributes.take("sourcelanguage"),
            language: attributes.take("language"),
            attributes: attributes.rest(),
        })
    }

    fn ts_body(&mut self) -> Result<TsBody, MalformedCatalogue> {
        let mut body = TsBody::default();
        loop {
            match self.next()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"context" => body.contexts.push(self.context(&start)?),
                    name if name.starts_with(b"extra-") => body.extra.push(self.extra(&start)?),
                    _ => return Err(self.unexpected_element(&start, "TS")),
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"context" => {
                        return Err(MalformedCatalogue::MissingContextName {
                            position: self.position,
                        });
                    },
                    name if name.starts_with(b"extra-") => body.extra.push(Extra {
                        name: element_name(&start),
                        content: self.empty_text(&start)?,
                    }),
                    _ => return Err(self.unexpected_element(&start, "TS")),
                },
                Event::End(_) => return Ok(body),
                Event::Text(text) if is_blank(&text) => {},
                Event::Text(_) | Event::CData(_) => return Err(self.unexpected_text("TS")),
                Event::Eof => return Err(unexpected_eof("TS")),
                _ => {},
            }
        }
    }

    fn context(&mut self, start: &BytesStart<'_>) -> Result<Context, MalformedCatalogue> {
        let position = self.position;
        let mut name = None;
        let mut context = Context {
            attributes: self.attributes(start)?.rest(),
            ..Default::default()
        };
        loop {
            match self.next()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"name" => name = Some(self.text(&start)?),
                    b"comment" => context.comment = Some(self.text(&start)?),
                    b"message" => {
                        let message =
                            self.message(&start, name.as_deref().unwrap_or_default())?;
                        context.messages.push(message);
                    },
                    _ => return Err(self.unexpected_element(&start, "context")),
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"name" => name = Some(self.empty_text(&start)?),
                    b"comment" => context.comment = Some(self.empty_text(&start)?),
                    b"message" if self.allow_missing_source => {
                        context.messages.push(self.message_head(&start)?);
                    },
                    b"message" => {
                        return Err(MalformedCatalogue::MissingSource {
                            context: name.unwrap_or_default(),
                            position: self.position,
                        });
                    },
                    _ => return Err(self.unexpected_element(&start, "context")),
                },
                Event::End(_) => break,
                Event::Text(text) if is_blank(&text) => {},
                Event::Text(_) | Event::CData(_) => return Err(self.unexpected_text("context")),
                Event::Eof => return Err(unexpected_eof("context")),
                _ => {},
            }
        }

        context.name = name.ok_or(MalformedCatalogue::MissingContextName { position })?;
        Ok(context)
    }

    /// A message with only the fields carried by its start tag.
    fn message_head(&self, start: &BytesStart<'_>) -> Result<Message, MalformedCatalogue> {
        let position = self.position;
        let mut attributes = self.attributes(start)?;
        let id = attributes.take("id");
        let numerus = match attributes.take("numerus") {
            None => false,
            Some(value) => match value.as_str() {
                "yes" | "true" => true,
                "no" | "false" => false,
                _ => return Err(self.invalid_attribute("message", "numerus", value, position)),
            },
        };
        Ok(Message {
            id,
            numerus,
            attributes: attributes.rest(),
            ..Default::default()
        })
    }

    fn message(
        &mut self,
        start: &BytesStart<'_>,
        context: &str,
    ) -> Result<Message, MalformedCatalogue> {
        let position = self.position;
        let mut message = self.message_head(start)?;

        let mut has_source = false;
        loop {
            match self.next()? {
                Event::Start(child) => match child.name().as_ref() {
                    b"location" => {
                        message.locations.push(self.location(&child)?);
                        self.skip_to_end("location")?;
                    },
                    b"source" => {
                        message.source = self.text(&child)?;
                        has_source = true;
                    },
                    b"oldsource" => message.old_source = Some(self.text(&child)?),
                    b"comment" => message.disambiguation = Some(self.text(&child)?),
                    b"oldcomment" => message.old_disambiguation = Some(self.text(&child)?),
                    b"extracomment" => message.extra_comment = Some(self.text(&child)?),
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.text(&child)?);
                    },
                    b"translation" => message.translation = self.translation(&child, false)?,
                    name if name.starts_with(b"extra-") => message.extra.push(self.extra(&child)?),
                    _ => return Err(self.unexpected_element(&child, "message")),
                },
                Event::Empty(child) => match child.name().as_ref() {
                    b"location" => message.locations.push(self.location(&child)?),
                    b"source" => {
                        message.source = self.empty_text(&child)?;
                        has_source = true;
                    },
                    b"oldsource" => message.old_source = Some(self.empty_text(&child)?),
                    b"comment" => message.disambiguation = Some(self.empty_text(&child)?),
                    b"oldcomment" => message.old_disambiguation = Some(self.empty_text(&child)?),
                    b"extracomment" => message.extra_comment = Some(self.empty_text(&child)?),
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.empty_text(&child)?);
                    },
                    b"translation" => message.translation = self.translation(&child, true)?,
                    name if name.starts_with(b"extra-") => message.extra.push(Extra {
                        name: element_name(&child),
                        content: self.empty_text(&child)?,
                    }),
                    _ => return Err(self.unexpected_element(&child, "message")),
                },
                Event::End(_) => break,
                Event::Text(text) if is_blank(&text) => {},
                Event::Text(_) | Event::CData(_) => return Err(self.unexpected_text("message")),
                Event::Eof => return Err(unexpected_eof("message")),
                _ => {},
            }
        }

        if !has_source && !self.allow_missing_source {
            return Err(MalformedCatalogue::MissingSource {
                context: context.to_string(),
                position,
            });
        }
        Ok(message)
    }

    fn location(&self, start: &BytesStart<'_>) -> Result<Location, MalformedCatalogue> {
        let mut attributes = self.attributes(start)?;
        Ok(Location {
            filename: attributes.take("filename"),
            line: attributes.take("line"),
            attributes: attributes.rest(),
        })
    }

    fn translation(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> Result<Translation, MalformedCatalogue> {
        let position = self.position;
        let mut attributes = self.attributes(start)?;
        let state = match attributes.take("type") {
            None => Default::default(),
            Some(value) => match value.parse() {
                Ok(state) => state,
                Err(()) => {
                    return Err(self.invalid_attribute("translation", "type", value, position));
                },
            },
        };
        // Rewritten from the forms themselves.
        attributes.take("variants");
        let attributes = attributes.rest();
        if empty {
            return Ok(Translation {
                state,
                body: TranslationBody::default(),
                attributes,
            });
        }

        let mut form = FormText::default();
        let mut forms = Vec::new();
        loop {
            match self.next()? {
                Event::Text(chunk) => self.push_text(&mut form.text, &chunk)?,
                Event::CData(chunk) => form.text.push_str(&String::from_utf8_lossy(&chunk)),
                Event::Empty(child) if child.name().as_ref() == b"byte" => {
                    self.byte(&child, &mut form.text)?;
                },
                Event::Start(child) if child.name().as_ref() == b"numerusform" => {
                    forms.push(self.numerus_form(&child)?);
                },
                Event::Empty(child) if child.name().as_ref() == b"numerusform" => {
                    self.numerus_form_attributes(&child)?;
                    forms.push(String::new());
                },
                Event::Start(child) if child.name().as_ref() == b"lengthvariant" => {
                    form.variants.push(self.text(&child)?);
                },
                Event::Empty(child) if child.name().as_ref() == b"lengthvariant" => {
                    form.variants.push(self.empty_text(&child)?);
                },
                Event::Start(child) | Event::Empty(child) => {
                    return Err(self.unexpected_element(&child, "translation"));
                },
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof("translation")),
                _ => {},
            }
        }

        let body = if forms.is_empty() {
            match form.finish() {
                Some(text) => TranslationBody::Text(text),
                None => return Err(self.unexpected_text("translation")),
            }
        } else if form.text.trim().is_empty() && form.variants.is_empty() {
            TranslationBody::Numerus(forms)
        } else {
            return Err(self.unexpected_text("translation"));
        };
        Ok(Translation {
            state,
            body,
            attributes,
        })
    }

    fn numerus_form_attributes(&self, start: &BytesStart<'_>) -> Result<(), MalformedCatalogue> {
        let mut attributes = self.attributes(start)?;
        attributes.take("variants");
        self.no_other_attributes(start, attributes)
    }

    fn numerus_form(&mut self, start: &BytesStart<'_>) -> Result<String, MalformedCatalogue> {
        self.numerus_form_attributes(start)?;
        let mut form = FormText::default();
        loop {
            match self.next()? {
                Event::Text(chunk) => self.push_text(&mut form.text, &chunk)?,
                Event::CData(chunk) => form.text.push_str(&String::from_utf8_lossy(&chunk)),
                Event::Empty(child) if child.name().as_ref() == b"byte" => {
                    self.byte(&child, &mut form.text)?;
                },
                Event::Start(child) if child.name().as_ref() == b"lengthvariant" => {
                    form.variants.push(self.text(&child)?);
                },
                Event::Empty(child) if child.name().as_ref() == b"lengthvariant" => {
                    form.variants.push(self.empty_text(&child)?);
                },
                Event::Start(child) | Event::Empty(child) => {
                    return Err(self.unexpected_element(&child, "numerusform"));
                },
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof("numerusform")),
                _ => {},
            }
        }
        form.finish()
            .ok_or_else(|| self.unexpected_text("numerusform"))
    }

    fn extra(&mut self, start: &BytesStart<'_>) -> Result<Extra, MalformedCatalogue> {
        Ok(Extra {
            name: element_name(start),
            content: self.text(start)?,
        })
    }

    /// Collects character data up to the closing tag of `start`.
    fn text(&mut self, start: &BytesStart<'_>) -> Result<String, MalformedCatalogue> {
        let parent = element_name(start);
        self.no_other_attributes(start, self.attributes(start)?)?;
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(chunk) => self.push_text(&mut text, &chunk)?,
                Event::CData(chunk) => text.push_str(&String::from_utf8_lossy(&chunk)),
                Event::Empty(child) if child.name().as_ref() == b"byte" => {
                    self.byte(&child, &mut text)?;
                },
                Event::Start(child) | Event::Empty(child) => {
                    return Err(self.unexpected_element(&child, &parent));
                },
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(unexpected_eof(&parent)),
                _ => {},
            }
        }
    }

    /// The empty text of a self-closing text element.
    fn empty_text(&self, start: &BytesStart<'_>) -> Result<String, MalformedCatalogue> {
        self.no_other_attributes(start, self.attributes(start)?)?;
        Ok(String::new())
    }

    fn skip_to_end(&mut self, parent: &str) -> Result<(), MalformedCatalogue> {
        loop {
            match self.next()? {
                Event::End(_) => return Ok(()),
                Event::Text(text) if is_blank(&text) => {},
                Event::Text(_) | Event::CData(_) => return Err(self.unexpected_text(parent)),
                Event::Start(child) | Event::Empty(child) => {
                    return Err(self.unexpected_element(&child, parent));
                },
                Event::Eof => return Err(unexpected_eof(parent)),
                _ => {},
            }
        }
    }

    fn push_text(&self, text: &mut String, chunk: &BytesText<'_>) -> Result<(), MalformedCatalogue> {
        let unescaped = chunk.unescape().map_err(|err| self.xml_error(err))?;
        text.push_str(&unescaped);
        Ok(())
    }

    /// `<byte value="x1b"/>` stands for a character XML cannot carry.
    fn byte(&self, start: &BytesStart<'_>, text: &mut String) -> Result<(), MalformedCatalogue> {
        let position = self.position;
        let mut attributes = self.attributes(start)?;
        let value = attributes.take("value").unwrap_or_default();
        self.no_other_attributes(start, attributes)?;
        let (digits, radix) = match value.strip_prefix('x') {
            Some(hex) => (hex, 16),
            None => (value.as_str(), 10),
        };
        match u32::from_str_radix(digits, radix).ok().and_then(char::from_u32) {
            Some('\0') => {},
            Some(decoded) => text.push(decoded),
            None => return Err(self.invalid_attribute("byte", "value", value, position)),
        }
        Ok(())
    }
}

fn offset<P: TryInto<u64>>(position: P) -> u64 {
    position.try_into().unwrap_or(u64::MAX)
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn unexpected_eof(parent: &str) -> MalformedCatalogue {
    MalformedCatalogue::UnexpectedEof {
        parent: parent.to_string(),
    }
}
