#[cfg(test)]
mod submission_tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::client_mock::{
        consultation_type, dated_record, sample_catalog, setup_mock_backend, verified_survey_type,
        MockBackendClient,
    };
    use crate::error::WidgetError;
    use crate::models::booking::{BookingDraft, BookingStatus, CustomerDetails, DatePreference};
    use crate::services::submission::{build_payload, resolve_status, submit_booking};
    use crate::verification::VerificationCode;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Alex Doe".to_string(),
            email: "alex@example.com".to_string(),
            phone: Some("0800 123 4567".to_string()),
            address: Some("1 High St".to_string()),
            notes: None,
        }
    }

    fn slot_draft() -> BookingDraft {
        BookingDraft {
            appointment_type: Some(consultation_type()),
            date: Some(date(4)),
            time: Some("10:00".to_string()),
            customer: customer(),
            source_record_id: Some("rec1".to_string()),
            specialist_email: Some("sam@example.com".to_string()),
            ..Default::default()
        }
    }

    fn custom_draft(preferences: Vec<DatePreference>) -> BookingDraft {
        BookingDraft {
            appointment_type: Some(consultation_type()),
            customer: customer(),
            preferences,
            is_custom_request: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_status_precedence() {
        assert_eq!(resolve_status(&slot_draft()), BookingStatus::Confirmed);

        let custom = custom_draft(vec![DatePreference {
            date: date(10),
            time: "09:00".to_string(),
        }]);
        assert_eq!(resolve_status(&custom), BookingStatus::Provisional);

        // Verification wins even over a custom request.
        let mut verified_custom = custom;
        verified_custom.appointment_type = Some(verified_survey_type());
        assert_eq!(
            resolve_status(&verified_custom),
            BookingStatus::PendingVerification
        );
    }

    #[test]
    fn test_payload_for_picked_slot() {
        let payload = build_payload(&slot_draft()).unwrap();

        assert_eq!(payload.customer_name, "Alex Doe");
        assert_eq!(payload.customer_email, "alex@example.com");
        assert_eq!(payload.customer_phone, "0800 123 4567");
        assert_eq!(payload.appointment_type, "Design Consultation");
        assert_eq!(payload.appointment_date, "2026-03-04");
        assert_eq!(payload.appointment_time, "10:00");
        assert_eq!(payload.duration_minutes, 60);
        assert_eq!(payload.status, BookingStatus::Confirmed);
        assert!(payload.verification_code.is_none());
        assert_eq!(payload.assigned_specialist.as_deref(), Some("sam@example.com"));
        assert!(payload.additional_requested_dates.is_none());
        assert_eq!(payload.google_event_id, "");
        assert_eq!(payload.cancellation_reason, "");
    }

    #[test]
    fn test_payload_for_custom_request() {
        let payload = build_payload(&custom_draft(vec![
            DatePreference {
                date: date(10),
                time: "09:00".to_string(),
            },
            DatePreference {
                date: date(11),
                time: "14:00".to_string(),
            },
            DatePreference {
                date: date(12),
                time: "16:00".to_string(),
            },
        ]))
        .unwrap();

        // First preference becomes the primary requested slot.
        assert_eq!(payload.appointment_date, "2026-03-10");
        assert_eq!(payload.appointment_time, "09:00");
        assert_eq!(payload.status, BookingStatus::Provisional);

        // The rest travel as a serialized JSON array of strings.
        let alternatives: Vec<String> =
            serde_json::from_str(payload.additional_requested_dates.as_deref().unwrap()).unwrap();
        assert_eq!(
            alternatives,
            vec![
                "2026-03-11 at 14:00".to_string(),
                "2026-03-12 at 16:00".to_string()
            ]
        );
    }

    #[test]
    fn test_single_preference_sends_no_alternatives() {
        let payload = build_payload(&custom_draft(vec![DatePreference {
            date: date(10),
            time: "09:00".to_string(),
        }]))
        .unwrap();

        assert!(payload.additional_requested_dates.is_none());
    }

    #[test]
    fn test_verification_type_gets_generated_code() {
        let mut draft = slot_draft();
        draft.appointment_type = Some(verified_survey_type());

        let payload = build_payload(&draft).unwrap();
        assert_eq!(payload.status, BookingStatus::PendingVerification);
        let code = payload.verification_code.unwrap();
        assert!(VerificationCode::is_valid_format(&code));
    }

    #[test]
    fn test_incomplete_drafts_rejected() {
        let mut no_type = slot_draft();
        no_type.appointment_type = None;
        assert!(matches!(
            build_payload(&no_type),
            Err(WidgetError::InvalidDraft(_))
        ));

        let mut no_date = slot_draft();
        no_date.date = None;
        assert!(matches!(
            build_payload(&no_date),
            Err(WidgetError::InvalidDraft(_))
        ));

        let mut no_time = slot_draft();
        no_time.time = None;
        assert!(matches!(
            build_payload(&no_time),
            Err(WidgetError::InvalidDraft(_))
        ));

        let no_preferences = custom_draft(Vec::new());
        assert!(matches!(
            build_payload(&no_preferences),
            Err(WidgetError::InvalidDraft(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_creates_appointment_and_releases_slot() {
        let (client, store) = setup_mock_backend(
            sample_catalog(),
            vec![dated_record("rec1", "2026-03-04", "10:00")],
        );

        let outcome = submit_booking(&client, &slot_draft()).await.unwrap();

        assert_eq!(outcome.result.id, "appt_1");
        assert_eq!(outcome.result.status, BookingStatus::Confirmed);
        assert!(outcome.slot_release_error.is_none());

        let created = store.created_appointments();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].customer_email, "alex@example.com");
        assert_eq!(store.released_slot_ids(), vec!["rec1".to_string()]);
    }

    #[tokio::test]
    async fn test_custom_request_releases_nothing() {
        let (client, store) = setup_mock_backend(sample_catalog(), Vec::new());

        let draft = custom_draft(vec![DatePreference {
            date: date(10),
            time: "09:00".to_string(),
        }]);
        let outcome = submit_booking(&client, &draft).await.unwrap();

        assert_eq!(outcome.result.status, BookingStatus::Provisional);
        assert!(outcome.slot_release_error.is_none());
        assert!(store.released_slot_ids().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let mut client = MockBackendClient::new();
        client.expect_create_appointment().returning(|_| {
            Err(WidgetError::Api {
                status: 500,
                message: "backend down".to_string(),
            })
        });

        let err = submit_booking(&client, &slot_draft()).await.unwrap_err();
        assert!(matches!(err, WidgetError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_release_failure_does_not_fail_the_booking() {
        let mut client = MockBackendClient::new();
        client
            .expect_create_appointment()
            .returning(|payload| Ok(echo_result(&payload)));
        client
            .expect_update_availability_slot()
            .withf(|id, patch| id == "rec1" && patch == &json!({ "is_active": false }))
            .returning(|_, _| {
                Err(WidgetError::Api {
                    status: 409,
                    message: "record locked".to_string(),
                })
            });

        let outcome = submit_booking(&client, &slot_draft()).await.unwrap();

        assert_eq!(outcome.result.status, BookingStatus::Confirmed);
        let release_error = outcome.slot_release_error.unwrap();
        assert!(release_error.contains("409"));
    }

    fn echo_result(
        payload: &crate::models::booking::AppointmentPayload,
    ) -> crate::models::booking::BookingResult {
        crate::models::booking::BookingResult {
            id: "appt_1".to_string(),
            customer_name: payload.customer_name.clone(),
            customer_email: payload.customer_email.clone(),
            appointment_type: payload.appointment_type.clone(),
            appointment_date: payload.appointment_date.clone(),
            appointment_time: payload.appointment_time.clone(),
            status: payload.status,
            verification_code: payload.verification_code.clone(),
        }
    }
}
