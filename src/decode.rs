use crate::details::{UpdateDetails, UpdateFile};
use crate::element::{is_end_sentinel, Reader};
use crate::error::{Error, Result};
use crate::limits::DecodeLimits;
use crate::marker::Tag;
use crate::record::Record;
use crate::registry::RegistryChange;
use crate::shortcut::ShortcutInfo;
use crate::MAGIC;

/// One decoded field of the record, before it has been applied to anything.
#[derive(Clone, Debug)]
enum Field {
    PostUpdateCommand(String),
    RegistryCount(i32),
    FileCount(i32),
    RegistryChange(RegistryChange),
    Shortcut(ShortcutInfo),
    DesktopShortcut(String),
    StartMenuShortcut(String),
    FolderToDelete(String),
    BeginFile,
    EndFile,
    File(FileField),
    Skipped(u8),
}

/// A field that belongs to the file instruction currently being assembled.
#[derive(Clone, Debug)]
enum FileField {
    Path(String),
    Execute(bool),
    ExecuteBefore(bool),
    Args(String),
    Assembly(bool),
    Wait(bool),
    Delete(bool),
    DeltaPatch(String),
    Checksum(i64),
}

impl FileField {
    fn apply(self, file: &mut UpdateFile) {
        match self {
            FileField::Path(v) => file.relative_path = v,
            FileField::Execute(v) => file.execute = v,
            FileField::ExecuteBefore(v) => file.execute_before_update = v,
            FileField::Args(v) => file.command_line_args = Some(v),
            FileField::Assembly(v) => file.is_assembly = v,
            FileField::Wait(v) => file.wait_for_execution = v,
            FileField::Delete(v) => file.delete_file = v,
            FileField::DeltaPatch(v) => file.delta_patch_relative_path = Some(v),
            FileField::Checksum(v) => file.new_file_checksum = v,
        }
    }
}

/// Read the payload that follows `tag`.
fn read_field(reader: &mut Reader, tag: Tag) -> Result<Field> {
    Ok(match tag {
        Tag::PostUpdateCommand => Field::PostUpdateCommand(reader.read_text()?),
        Tag::RegistryCount => Field::RegistryCount(reader.read_int32()?),
        Tag::FileCount => Field::FileCount(reader.read_int32()?),
        Tag::RegistryChange => Field::RegistryChange(RegistryChange::decode_one(reader)?),
        Tag::Shortcut => Field::Shortcut(ShortcutInfo::decode_one(reader)?),
        Tag::DesktopShortcut => Field::DesktopShortcut(reader.read_text()?),
        Tag::StartMenuShortcut => Field::StartMenuShortcut(reader.read_text()?),
        Tag::FolderToDelete => Field::FolderToDelete(reader.read_text()?),
        Tag::BeginFile => Field::BeginFile,
        Tag::EndFile => Field::EndFile,
        Tag::FilePath => Field::File(FileField::Path(reader.read_text()?)),
        Tag::FileExecute => Field::File(FileField::Execute(reader.read_bool()?)),
        Tag::FileExecuteBefore => Field::File(FileField::ExecuteBefore(reader.read_bool()?)),
        Tag::FileArgs => Field::File(FileField::Args(reader.read_text()?)),
        Tag::FileAssembly => Field::File(FileField::Assembly(reader.read_bool()?)),
        Tag::FileWait => Field::File(FileField::Wait(reader.read_bool()?)),
        Tag::FileDelete => Field::File(FileField::Delete(reader.read_bool()?)),
        Tag::FileDeltaPatch => Field::File(FileField::DeltaPatch(reader.read_text()?)),
        Tag::FileChecksum => Field::File(FileField::Checksum(reader.read_int64()?)),
        Tag::End | Tag::Unknown(_) => {
            let tag = tag.into_u8();
            reader.skip_field(tag)?;
            Field::Skipped(tag)
        }
    })
}

/// Where the decoder is relative to file-instruction blocks.
enum State {
    Idle,
    BuildingFile(UpdateFile),
}

/// Accumulates decoded fields into an [`UpdateDetails`].
struct Builder {
    details: UpdateDetails,
    state: State,
    max_reserve: usize,
}

impl Builder {
    fn new(limits: &DecodeLimits) -> Self {
        Self {
            details: UpdateDetails::default(),
            state: State::Idle,
            max_reserve: limits.max_reserve,
        }
    }

    fn reserve_hint(&self, hint: i32) -> usize {
        (hint.max(0) as usize).min(self.max_reserve)
    }

    fn apply(&mut self, field: Field) -> Result<()> {
        match field {
            Field::PostUpdateCommand(v) => self.details.post_update_command = Some(v),
            Field::RegistryCount(hint) => {
                let hint = self.reserve_hint(hint);
                self.details.registry_changes.reserve(hint);
            }
            Field::FileCount(hint) => {
                let hint = self.reserve_hint(hint);
                self.details.update_files.reserve(hint);
            }
            Field::RegistryChange(v) => self.details.registry_changes.push(v),
            Field::Shortcut(v) => self.details.shortcuts.push(v),
            Field::DesktopShortcut(v) => self.details.previous_desktop_shortcuts.push(v),
            Field::StartMenuShortcut(v) => self.details.previous_start_menu_shortcuts.push(v),
            Field::FolderToDelete(v) => self.details.folders_to_delete.push(v),
            Field::BeginFile => {
                let previous = std::mem::replace(
                    &mut self.state,
                    State::BuildingFile(UpdateFile::default()),
                );
                if let State::BuildingFile(file) = previous {
                    tracing::warn!(
                        path = %file.relative_path,
                        "file instruction block started before the previous one ended, dropping it"
                    );
                }
            }
            Field::EndFile => match std::mem::replace(&mut self.state, State::Idle) {
                State::BuildingFile(file) => {
                    if file.relative_path.is_empty() {
                        return Err(Error::BadEncode(String::from(
                            "File instruction block has no relative path",
                        )));
                    }
                    self.details.update_files.push(file);
                }
                State::Idle => {
                    tracing::warn!("file instruction block ended without being started");
                }
            },
            Field::File(field) => match self.state {
                State::BuildingFile(ref mut file) => field.apply(file),
                State::Idle => {
                    tracing::warn!(?field, "file instruction field outside of a block, ignoring it");
                }
            },
            Field::Skipped(_) => (),
        }
        Ok(())
    }

    fn finish(self) -> UpdateDetails {
        if let State::BuildingFile(file) = self.state {
            tracing::warn!(
                path = %file.relative_path,
                "record ended inside a file instruction block, dropping it"
            );
        }
        self.details
    }
}

impl UpdateDetails {
    /// Decode an update details record with the default limits.
    ///
    /// The data must start with the `IUUDFV2` identifier and run through the end-of-record
    /// marker; anything after that marker is ignored. Tags this version doesn't know are skipped
    /// according to their shape, so records written by newer versions still decode.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_with(data, &DecodeLimits::default())
    }

    pub fn decode_with(data: &[u8], limits: &DecodeLimits) -> Result<Self> {
        let mut reader = Reader::with_limits(data, limits.clone());
        if !reader.validate_header(MAGIC) {
            return Err(Error::BadHeader {
                expected: MAGIC,
                found: data.iter().take(MAGIC.len()).copied().collect(),
            });
        }

        let mut builder = Builder::new(reader.limits());
        loop {
            let tag = reader.read_tag().map_err(|_| Error::LengthTooShort {
                step: "find end of record",
                actual: 0,
                expected: 1,
            })?;
            if is_end_sentinel(tag) {
                break;
            }
            let field = read_field(&mut reader, Tag::from_u8(tag))?;
            builder.apply(field)?;
        }

        let details = builder.finish();
        tracing::debug!(
            len = reader.offset(),
            registry_changes = details.registry_changes.len(),
            update_files = details.update_files.len(),
            shortcuts = details.shortcuts.len(),
            "decoded update details"
        );
        Ok(details)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::*;

    fn header() -> Vec<u8> {
        let mut enc = Vec::new();
        write_header(&mut enc, MAGIC);
        enc
    }

    #[test]
    fn empty_record() {
        let mut enc = header();
        enc.push(0xff);
        let details = UpdateDetails::decode(&enc).unwrap();
        assert_eq!(details, UpdateDetails::default());
        assert!(details.post_update_command.is_none());
    }

    #[test]
    fn missing_end() {
        let enc = header();
        match UpdateDetails::decode(&enc) {
            Err(Error::LengthTooShort { .. }) => (),
            other => panic!("expected LengthTooShort, got {:?}", other),
        }
    }

    #[test]
    fn bad_header() {
        let mut enc = header();
        enc.push(0xff);
        for i in 0..MAGIC.len() {
            let mut bad = enc.clone();
            bad[i] ^= 0x20;
            match UpdateDetails::decode(&bad) {
                Err(Error::BadHeader { found, .. }) => assert_eq!(found, &bad[..MAGIC.len()]),
                other => panic!("byte {} altered, expected BadHeader, got {:?}", i, other),
            }
        }
        assert!(matches!(
            UpdateDetails::decode(b"IUUDF"),
            Err(Error::BadHeader { .. })
        ));
        assert!(matches!(
            UpdateDetails::decode(b""),
            Err(Error::BadHeader { .. })
        ));
    }

    #[test]
    fn trailing_data_ignored() {
        let mut enc = header();
        write_text(&mut enc, 0x60, "temp");
        enc.push(0xff);
        enc.extend_from_slice(&[0x00, 0xa0, 0x13]);
        let details = UpdateDetails::decode(&enc).unwrap();
        assert_eq!(details.folders_to_delete, vec!["temp".to_string()]);
    }

    #[test]
    fn count_hints_are_not_lengths() {
        let mut enc = header();
        write_int32(&mut enc, 0x20, 5);
        write_int32(&mut enc, 0x21, -3);
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "a.dll");
        write_bool(&mut enc, 0x46, true);
        enc.push(0x9b);
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "b.dll");
        write_bool(&mut enc, 0x44, true);
        enc.push(0x9b);
        // A second hint after elements were read doesn't throw them away.
        write_int32(&mut enc, 0x21, i32::MAX);
        enc.push(0xff);
        let details = UpdateDetails::decode(&enc).unwrap();
        assert!(details.registry_changes.is_empty());
        assert_eq!(details.update_files.len(), 2);
        assert_eq!(details.update_files[0].relative_path, "a.dll");
        assert!(details.update_files[0].delete_file);
        assert_eq!(details.update_files[1].relative_path, "b.dll");
        assert!(details.update_files[1].is_assembly);
    }

    #[test]
    fn all_file_fields() {
        let mut enc = header();
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "tool.exe");
        write_bool(&mut enc, 0x41, true);
        write_bool(&mut enc, 0x42, true);
        write_text(&mut enc, 0x43, "--migrate");
        write_bool(&mut enc, 0x44, true);
        write_bool(&mut enc, 0x45, true);
        write_bool(&mut enc, 0x46, true);
        write_text(&mut enc, 0x47, "tool.exe.patch");
        write_int64(&mut enc, 0x48, -77);
        enc.push(0x9b);
        enc.push(0xff);
        let details = UpdateDetails::decode(&enc).unwrap();
        // Both a delete flag and a patch is accepted, that's for the updater to sort out.
        assert_eq!(
            details.update_files,
            vec![UpdateFile {
                relative_path: String::from("tool.exe"),
                execute: true,
                execute_before_update: true,
                wait_for_execution: true,
                command_line_args: Some(String::from("--migrate")),
                is_assembly: true,
                delete_file: true,
                delta_patch_relative_path: Some(String::from("tool.exe.patch")),
                new_file_checksum: -77,
            }]
        );
    }

    #[test]
    fn file_block_without_path() {
        let mut enc = header();
        enc.push(0x8b);
        write_bool(&mut enc, 0x41, true);
        enc.push(0x9b);
        enc.push(0xff);
        assert!(matches!(
            UpdateDetails::decode(&enc),
            Err(Error::BadEncode(_))
        ));
    }

    #[test]
    fn file_fields_outside_block_ignored() {
        let mut enc = header();
        write_text(&mut enc, 0x40, "stray.dll");
        write_bool(&mut enc, 0x46, true);
        enc.push(0x9b);
        write_text(&mut enc, 0x60, "temp");
        enc.push(0xff);
        let details = UpdateDetails::decode(&enc).unwrap();
        assert!(details.update_files.is_empty());
        assert_eq!(details.folders_to_delete, vec!["temp".to_string()]);
    }

    #[test]
    fn unterminated_blocks_dropped() {
        let mut enc = header();
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "first.dll");
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "second.dll");
        write_bool(&mut enc, 0x46, true);
        enc.push(0x9b);
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "third.dll");
        enc.push(0xff);
        let details = UpdateDetails::decode(&enc).unwrap();
        assert_eq!(details.update_files.len(), 1);
        assert_eq!(details.update_files[0].relative_path, "second.dll");
        assert!(details.update_files[0].delete_file);
    }

    #[test]
    fn staging_starts_fresh() {
        let mut enc = header();
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "a.exe");
        write_bool(&mut enc, 0x41, true);
        write_text(&mut enc, 0x43, "/s");
        enc.push(0x9b);
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "b.dll");
        write_bool(&mut enc, 0x44, true);
        enc.push(0x9b);
        enc.push(0xff);
        let details = UpdateDetails::decode(&enc).unwrap();
        assert_eq!(details.update_files[1], UpdateFile {
            is_assembly: true,
            ..UpdateFile::new("b.dll")
        });
    }

    #[test]
    fn unknown_tags_skipped() {
        let mut enc = header();
        write_text(&mut enc, 0x02, "newer text");
        write_int32(&mut enc, 0x2a, 17);
        enc.push(0x8b);
        write_text(&mut enc, 0x40, "a.dll");
        write_bool(&mut enc, 0x4c, true);
        write_int64(&mut enc, 0x5e, 1 << 40);
        write_bool(&mut enc, 0x46, true);
        enc.push(0x9c);
        enc.push(0x9b);
        enc.push(0x8f);
        write_text(&mut enc, 0x01, "inside an unknown object");
        enc.push(0x9f);
        write_text(&mut enc, 0x7e, "another");
        enc.push(0xff);
        let details = UpdateDetails::decode(&enc).unwrap();
        assert!(details.post_update_command.is_none());
        assert_eq!(details.update_files, vec![UpdateFile {
            delete_file: true,
            ..UpdateFile::new("a.dll")
        }]);
    }

    #[test]
    fn unskippable_tag() {
        let mut enc = header();
        enc.push(0xa5);
        enc.push(0xff);
        assert!(matches!(
            UpdateDetails::decode(&enc),
            Err(Error::BadEncode(_))
        ));
    }

    #[test]
    fn collaborator_errors_pass_through() {
        let mut enc = header();
        enc.push(RegistryChange::TAG);
        write_int32(&mut enc, 0x20, 12);
        enc.push(RegistryChange::END);
        enc.push(0xff);
        match UpdateDetails::decode(&enc) {
            Err(Error::BadEncode(msg)) => assert!(msg.contains("RegOperation"), "{}", msg),
            other => panic!("expected BadEncode, got {:?}", other),
        }
    }

    #[test]
    fn text_limit() {
        let mut enc = header();
        write_text(&mut enc, 0x01, "a rather long post-update command");
        enc.push(0xff);
        let limits = DecodeLimits {
            max_text_len: 8,
            ..DecodeLimits::default()
        };
        assert!(matches!(
            UpdateDetails::decode_with(&enc, &limits),
            Err(Error::LengthTooLong { max: 8, .. })
        ));
        assert!(UpdateDetails::decode(&enc).is_ok());
    }
}
