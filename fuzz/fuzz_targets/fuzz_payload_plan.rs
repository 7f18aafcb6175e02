#![no_main]

use libfuzzer_sys::fuzz_target;
use noterelay::fuzz_api::{Payload, VideoStrategy, compose, plan_media};

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<Payload>(data) else {
        return;
    };
    let note = payload.body.note;
    for strategy in [VideoStrategy::Compat, VideoStrategy::PreferVideo] {
        let plan = plan_media(note.files(), strategy);
        assert!(plan.to_upload.len() <= 4);
        let _ = compose(note.cw.as_deref(), note.text.as_deref(), &plan.to_link_only);
    }
});
