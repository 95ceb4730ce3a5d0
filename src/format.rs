/*!

The update details record format.

A record is the 7-byte file identifier `IUUDFV2`, followed by a sequence of fields, followed by
the end-of-record marker `0xFF`. Each field is a one-byte tag and a payload. Integers are
little-endian. Anything after the end-of-record marker is ignored.

# Payload Shapes

| Shape  | Payload                                                        |
| --     | --                                                             |
| Marker | Nothing                                                        |
| Bool   | 1 byte, nonzero is true                                        |
| Int32  | 4 bytes, signed                                                |
| Int64  | 8 bytes, signed                                                |
| Text   | Int32 byte length, then that many bytes of UTF-8               |
| Object | A nested sequence of fields, closed by the object's end marker |

# Fields

| Tag  | Field                                  | Shape  |
| --   | --                                     | --     |
| 0x01 | Post-update command line               | Text   |
| 0x20 | Registry change count                  | Int32  |
| 0x21 | File instruction count                 | Int32  |
| 0x30 | Previous desktop shortcut              | Text   |
| 0x31 | Previous start menu shortcut           | Text   |
| 0x40 | File: relative path                    | Text   |
| 0x41 | File: execute                          | Bool   |
| 0x42 | File: execute before update            | Bool   |
| 0x43 | File: command line arguments           | Text   |
| 0x44 | File: needs native compilation         | Bool   |
| 0x45 | File: wait for execution               | Bool   |
| 0x46 | File: delete                           | Bool   |
| 0x47 | File: delta patch relative path        | Text   |
| 0x48 | File: checksum of the patched file     | Int64  |
| 0x60 | Folder to delete                       | Text   |
| 0x8B | Begin file instruction                 | Marker |
| 0x9B | End file instruction                   | Marker |
| 0x8D | Shortcut, closed by 0x9D               | Object |
| 0x8E | Registry change, closed by 0x9E        | Object |
| 0xFF | End of record                          | Marker |

The two counts are hints for sizing storage only. They need not match the number of elements
that follow; the file instruction count in particular only counts files that are executed or
compiled.

Fields written by this version appear in the order of the table above, except that registry
changes follow their count, shortcuts come before the previous-shortcut paths, and folders to
delete come last. A file instruction is written as `0x8B`, its fields, then `0x9B`, and only if it
executes, compiles, deletes, or patches the file. Execution details (0x41, 0x42, 0x45, 0x43) are
only written for executed files, and a deleted file carries no patch.

# Unknown Tags

A tag that a reader doesn't recognize is skipped using the shape assigned to its range:

| Range     | Shape                                          |
| --        | --                                             |
| 0x00      | None, decoding fails                           |
| 0x01-0x1F | Text                                           |
| 0x20-0x2F | Int32                                          |
| 0x30-0x3F | Text                                           |
| 0x40-0x4F | Bool                                           |
| 0x50-0x5F | Int64                                          |
| 0x60-0x7F | Text                                           |
| 0x80-0x8F | Object, closed by the tag plus 0x10            |
| 0x90-0x9F | Marker                                         |
| 0xA0-0xFE | None, decoding fails                           |

Known tags always use the shape in the field table, even where it differs from their range.
Objects may nest; the fields inside an unknown object are skipped by the same rules.

# Registry Changes

| Tag  | Field                                                      | Shape |
| --   | --                                                         | --    |
| 0x20 | Operation: create key, remove key, create value, remove value (0-3) | Int32 |
| 0x21 | Root: classes root, current config, current user, local machine, users (0-4) | Int32 |
| 0x01 | Sub key                                                    | Text  |
| 0x02 | Value name                                                 | Text  |
| 0x22 | Value kind: string, expand string, multi string, dword, qword, binary (0-5) | Int32 |
| 0x03 | Value data                                                 | Text  |

# Shortcuts

| Tag  | Field                                        | Shape |
| --   | --                                           | --    |
| 0x01 | Target path                                  | Text  |
| 0x02 | Working directory                            | Text  |
| 0x03 | Arguments                                    | Text  |
| 0x04 | Description                                  | Text  |
| 0x05 | Icon path                                    | Text  |
| 0x20 | Icon index                                   | Int32 |
| 0x21 | Window style: normal (1), maximized (3), minimized (7) | Int32 |
| 0x06 | Shortcut file path, relative                 | Text  |

*/
