#![no_main]

use libfuzzer_sys::fuzz_target;

use domain::audit::entity::{AuditCommand, AuditEvent, AuditStatus};
use domain::common::error::DomainError;
use domain::common::sort::decode_page_request;
use domain::customer::entity::Customer;

// Fuzz sort and page decoding, then apply the decoded request.
//
// Layout:
//   [0]    = page index
//   [1]    = page size (0 must be rejected)
//   [2]    = collection selector (even=audit, odd=customers)
//   rest   = raw sort string (lossy UTF-8)
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let index = usize::from(data[0]);
    let size = usize::from(data[1]);
    let raw = String::from_utf8_lossy(&data[3..]);

    if data[2] % 2 == 0 {
        match decode_page_request::<AuditEvent>(Some(&raw), index, size) {
            Ok(request) => {
                let events: Vec<AuditEvent> = (0..16u64)
                    .map(|i| {
                        AuditEvent::from_command(
                            AuditCommand::new("CREATE_CUSTOMER", AuditStatus::Success)
                                .with_entity_id(Some(i))
                                .at(i * 7 % 5),
                        )
                        .with_id(i)
                    })
                    .collect();
                let page = request.apply(events);
                assert!(page.items.len() <= size);
                assert_eq!(page.total_elements, 16);
            }
            Err(DomainError::MalformedQuery(_)) => {}
            Err(e) => panic!("unexpected error kind: {e}"),
        }
    } else {
        match decode_page_request::<Customer>(Some(&raw), index, size) {
            Ok(request) => {
                let page = request.apply(Vec::<Customer>::new());
                assert!(page.items.is_empty());
                assert_eq!(page.total_pages(), 0);
            }
            Err(DomainError::MalformedQuery(_)) => {}
            Err(e) => panic!("unexpected error kind: {e}"),
        }
    }
});
