#![no_main]
use libfuzzer_sys::fuzz_target;
use update_details::UpdateDetails;

fuzz_target!(|data: &[u8]| {
    if let Ok(details) = UpdateDetails::decode(data) {
        // Anything that decodes must survive another trip through the encoder.
        let again = UpdateDetails::decode(&details.encode()).unwrap();
        assert_eq!(again.registry_changes, details.registry_changes);
        assert_eq!(again.shortcuts, details.shortcuts);
        assert_eq!(again.folders_to_delete, details.folders_to_delete);
    }
});
