use quick_xml::events::Event;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::{Rule, SlicerError};

/// Apply a selection rule to a raw RSS document.
///
/// Events are streamed from the input straight to the output, so the XML
/// declaration, channel metadata, attributes, and CDATA sections all pass
/// through verbatim. Only `<item>` elements sitting directly under
/// `<channel>` are touched: they are counted by zero-based position in
/// document order and emitted only when the rule keeps that position.
/// Dropped items are skipped whole rather than deleted in place, so the
/// positions of later items never shift mid-pass.
pub fn slice_feed(xml: &[u8], rule: Rule) -> crate::Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    // Local names of currently open elements, used to recognize items that
    // are direct children of <channel> (and nothing nested deeper).
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut saw_channel = false;
    let mut item_index: usize = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let local = e.local_name().as_ref().to_vec();
                if local == b"channel" {
                    saw_channel = true;
                }

                if is_channel_item(&open, &local) {
                    let keep = rule.keeps(item_index);
                    item_index += 1;

                    if keep {
                        open.push(local);
                        writer.write_event(Event::Start(e)).map_err(ser_err)?;
                    } else {
                        let end = e.to_end().into_owned();
                        reader
                            .read_to_end_into(end.name(), &mut skip_buf)
                            .map_err(|err| SlicerError::Malformed(err.to_string()))?;
                    }
                } else {
                    open.push(local);
                    writer.write_event(Event::Start(e)).map_err(ser_err)?;
                }
            }
            Ok(Event::Empty(e)) => {
                let local = e.local_name().as_ref().to_vec();
                if is_channel_item(&open, &local) {
                    let keep = rule.keeps(item_index);
                    item_index += 1;
                    if keep {
                        writer.write_event(Event::Empty(e)).map_err(ser_err)?;
                    }
                } else {
                    writer.write_event(Event::Empty(e)).map_err(ser_err)?;
                }
            }
            Ok(Event::End(e)) => {
                open.pop();
                writer.write_event(Event::End(e)).map_err(ser_err)?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => {
                writer.write_event(event).map_err(ser_err)?;
            }
            Err(e) => return Err(SlicerError::Malformed(e.to_string())),
        }
        buf.clear();
    }

    if !saw_channel {
        return Err(SlicerError::Malformed(
            "document has no <channel> element".into(),
        ));
    }

    tracing::debug!(
        kept = item_index.div_ceil(rule.get() as usize),
        total = item_index,
        rule = rule.get(),
        "sliced feed"
    );

    Ok(writer.into_inner())
}

fn is_channel_item(open: &[Vec<u8>], local: &[u8]) -> bool {
    local == b"item" && open.last().map(Vec::as_slice) == Some(b"channel".as_slice())
}

fn ser_err(e: impl std::fmt::Display) -> SlicerError {
    SlicerError::Malformed(format!("failed to re-serialize feed: {e}"))
}
