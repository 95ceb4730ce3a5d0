use crate::details::{UpdateDetails, UpdateFile};
use crate::element::*;
use crate::marker::Tag;
use crate::record::Record;
use crate::MAGIC;

impl UpdateFile {
    /// Write this instruction as a begin/end delimited block.
    fn encode_block(&self, buf: &mut Vec<u8>) {
        write_marker(buf, Tag::BeginFile.into());
        write_text(buf, Tag::FilePath.into(), &self.relative_path);

        if self.execute {
            write_bool(buf, Tag::FileExecute.into(), true);
            write_bool(buf, Tag::FileExecuteBefore.into(), self.execute_before_update);
            write_bool(buf, Tag::FileWait.into(), self.wait_for_execution);
            if let Some(args) = self.command_line_args.as_deref().filter(|a| !a.is_empty()) {
                write_text(buf, Tag::FileArgs.into(), args);
            }
        }

        write_bool(buf, Tag::FileAssembly.into(), self.is_assembly);

        // A deleted file has nothing to patch.
        if self.delete_file {
            write_bool(buf, Tag::FileDelete.into(), true);
        } else if let Some(ref patch) = self.delta_patch_relative_path {
            write_text(buf, Tag::FileDeltaPatch.into(), patch);
            if self.new_file_checksum != 0 {
                write_int64(buf, Tag::FileChecksum.into(), self.new_file_checksum);
            }
        }

        write_marker(buf, Tag::EndFile.into());
    }
}

impl UpdateDetails {
    /// Encode into a new buffer, starting with the file identifier and ending with the
    /// end-of-record marker.
    ///
    /// File instructions that don't do anything (see [`UpdateFile::is_actionable`]) are left out,
    /// as are instructions with an empty relative path.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf);
        buf
    }

    /// Append the encoded record to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        let start = buf.len();
        write_header(buf, MAGIC);

        if let Some(command) = self.post_update_command.as_deref().filter(|c| !c.is_empty()) {
            write_text(buf, Tag::PostUpdateCommand.into(), command);
        }

        let registry_count = i32::try_from(self.registry_changes.len()).unwrap_or(i32::MAX);
        write_int32(buf, Tag::RegistryCount.into(), registry_count);
        for change in self.registry_changes.iter() {
            change.encode_one(buf, true);
        }

        for shortcut in self.shortcuts.iter() {
            shortcut.encode_one(buf, true);
        }

        for path in self.previous_desktop_shortcuts.iter() {
            write_text(buf, Tag::DesktopShortcut.into(), path);
        }
        for path in self.previous_start_menu_shortcuts.iter() {
            write_text(buf, Tag::StartMenuShortcut.into(), path);
        }

        write_int32(buf, Tag::FileCount.into(), self.file_count_hint());
        for file in self.update_files.iter().filter(|f| f.is_actionable()) {
            // A block without a path can't be read back.
            if file.relative_path.is_empty() {
                tracing::warn!("leaving out file instruction with no relative path");
                continue;
            }
            file.encode_block(buf);
        }

        for folder in self.folders_to_delete.iter() {
            write_text(buf, Tag::FolderToDelete.into(), folder);
        }

        write_marker(buf, Tag::End.into());
        tracing::debug!(len = buf.len() - start, "encoded update details");
    }
}
