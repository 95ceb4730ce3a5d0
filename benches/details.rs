use criterion::{black_box, criterion_group, criterion_main, Criterion};
use update_details::{RegOperation, RegRoot, RegistryChange, ShortcutInfo, UpdateDetails, UpdateFile};

fn large_details() -> UpdateDetails {
    let mut details = UpdateDetails::new();
    details.post_update_command = Some(String::from("app.exe /updated"));
    for i in 0..64 {
        let mut change =
            RegistryChange::new(RegOperation::CreateValue, RegRoot::CurrentUser, "Software\\Bench");
        change.value_name = Some(format!("Value{}", i));
        change.value_data = Some(i.to_string());
        details.registry_changes.push(change);
    }
    for i in 0..4 {
        details
            .shortcuts
            .push(ShortcutInfo::new(format!("bin\\tool{}.exe", i), format!("Tool {}.lnk", i)));
    }
    for i in 0..2000 {
        let path = format!("data\\pack{:04}.dat", i);
        let file = match i % 4 {
            0 => UpdateFile {
                delta_patch_relative_path: Some(format!("{}.patch", path)),
                new_file_checksum: i as i64 * 7919,
                ..UpdateFile::new(path)
            },
            1 => UpdateFile {
                delete_file: true,
                ..UpdateFile::new(path)
            },
            2 => UpdateFile {
                is_assembly: true,
                ..UpdateFile::new(path)
            },
            _ => UpdateFile::new(path),
        };
        details.update_files.push(file);
    }
    details.folders_to_delete.push(String::from("cache"));
    details
}

fn encode(c: &mut Criterion) {
    let details = large_details();
    c.bench_function("encode 2000 files", |b| b.iter(|| black_box(&details).encode()));
}

fn decode(c: &mut Criterion) {
    let encoded = large_details().encode();
    c.bench_function("decode 2000 files", |b| {
        b.iter(|| UpdateDetails::decode(black_box(&encoded)).unwrap())
    });
}

criterion_group!(benches, encode, decode);
criterion_main!(benches);
