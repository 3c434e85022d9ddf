#[cfg(test)]
mod test {
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    use crate::api::plant_request::PlantRequest;
    use crate::error::OssError;
    use crate::observability::error_log::{
        ACTIVE_EQUIPMENT_ERROR_TITLE, AUTH_ERROR_TITLE, DEVICES_ERROR_TITLE, SN_DATA_ERROR_TITLE,
    };
    use crate::tests::common::{harness, harness_at, mock_login, TEST_TOKEN};

    const BEARER: &str = "Bearer t-1";

    // -------------------------------
    // active equipment
    // -------------------------------

    #[tokio::test]
    async fn active_equipment_passes_body_through() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, TEST_TOKEN).await;
        let body = json!({ "result": 1, "data": [{ "serialNumber": "SN1", "devicemodel": "MIN 5000TL-X", "status": "1" }] });
        let endpoint = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/oss/getActiveEquipaments")
                    .query_param("accountName", "A1")
                    .query_param("plantId", "P1")
                    .header("authorization", BEARER);
                then.status(200).json_body(body.clone());
            })
            .await;
        let h = harness(&server);

        let response = h.client.active_equipment("P1", "A1").await.unwrap();

        assert_eq!(response, body);
        endpoint.assert_hits_async(1).await;
        login.assert_hits_async(1).await;
        assert!(h.log.records().is_empty());
    }

    #[tokio::test]
    async fn active_equipment_without_data_warns_and_returns_body() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/oss/getActiveEquipaments");
                then.status(200).json_body(json!({ "result": 1, "data": [] }));
            })
            .await;
        let h = harness(&server);

        let response = h.client.active_equipment("P1", "A1").await.unwrap();

        assert_eq!(response["data"], json!([]));
        let warnings = h.log.warnings_titled(ACTIVE_EQUIPMENT_ERROR_TITLE);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "No active equipments found");
    }

    #[tokio::test]
    async fn active_equipment_requires_both_parameters() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, TEST_TOKEN).await;
        let endpoint = server
            .mock_async(|when, then| {
                when.method(GET).path("/oss/getActiveEquipaments");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;
        let h = harness(&server);

        let err = h.client.active_equipment("", "A1").await.unwrap_err();
        assert!(matches!(err, OssError::MissingParameter("plantId")));
        let err = h.client.active_equipment("P1", "  ").await.unwrap_err();
        assert!(matches!(err, OssError::MissingParameter("accountName")));

        login.assert_hits_async(0).await;
        endpoint.assert_hits_async(0).await;
        assert_eq!(h.log.errors_titled(ACTIVE_EQUIPMENT_ERROR_TITLE).len(), 2);
    }

    #[tokio::test]
    async fn active_equipment_surfaces_server_error() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/oss/getActiveEquipaments");
                then.status(500).body("internal");
            })
            .await;
        let h = harness(&server);

        let err = h.client.active_equipment("P1", "A1").await.unwrap_err();

        assert!(matches!(err, OssError::Http { endpoint: "getActiveEquipaments", .. }));
        assert!(err.to_string().contains("500"), "unexpected message: {err}");
        let errors = h.log.errors_titled(ACTIVE_EQUIPMENT_ERROR_TITLE);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, err.to_string());
    }

    // -------------------------------
    // serial number search
    // -------------------------------

    #[tokio::test]
    async fn search_posts_form_with_fixed_scope() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        let body = json!({ "result": 1, "obj": { "srv": [{ "serverId": "1", "plantId": "P1", "accountName": "A1" }] } });
        let endpoint = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oss/searchInverter")
                    .header("authorization", BEARER)
                    .header("content-type", "application/x-www-form-urlencoded")
                    .form_urlencoded_tuple("serverID", "1")
                    .form_urlencoded_tuple("type", "0")
                    .form_urlencoded_tuple("deviceSN", "SN123");
                then.status(200).json_body(body.clone());
            })
            .await;
        let h = harness(&server);

        let response = h.client.search_serial_number("SN123").await.unwrap();

        assert_eq!(response, body);
        endpoint.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn search_with_empty_obj_warns() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oss/searchInverter");
                then.status(200).json_body(json!({ "result": 1, "obj": {} }));
            })
            .await;
        let h = harness(&server);

        h.client.search_serial_number("SN123").await.unwrap();

        assert_eq!(h.log.warnings_titled(SN_DATA_ERROR_TITLE).len(), 1);
    }

    #[tokio::test]
    async fn search_requires_serial_number() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, TEST_TOKEN).await;
        let h = harness(&server);

        let err = h.client.search_serial_number("").await.unwrap_err();

        assert!(matches!(err, OssError::MissingParameter("serialNumber")));
        login.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn search_surfaces_server_error() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oss/searchInverter");
                then.status(500);
            })
            .await;
        let h = harness(&server);

        let err = h.client.search_serial_number("SN123").await.unwrap_err();

        assert!(err.to_string().contains("500"), "unexpected message: {err}");
        assert_eq!(h.log.errors_titled(SN_DATA_ERROR_TITLE).len(), 1);
    }

    // -------------------------------
    // devices by plant
    // -------------------------------

    #[tokio::test]
    async fn devices_by_plant_queries_first_page() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        let body = json!({ "result": 1, "obj": { "currPage": 1, "pages": 1, "datas": [{ "sn": "SN1", "plantName": "Roof" }] } });
        let endpoint = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/oss/getDevicesByPlantList")
                    .query_param("serverId", "7")
                    .query_param("plantId", "P1")
                    .query_param("username", "A1")
                    .query_param("currPage", "1")
                    .header("authorization", BEARER);
                then.status(200).json_body(body.clone());
            })
            .await;
        let h = harness(&server);

        let response = h
            .client
            .devices_by_plant(&PlantRequest::new("A1", "P1", 7))
            .await
            .unwrap();

        assert_eq!(response, body);
        endpoint.assert_hits_async(1).await;
        assert!(h.log.records().is_empty());
    }

    #[tokio::test]
    async fn devices_by_plant_requires_username() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, TEST_TOKEN).await;
        let h = harness(&server);

        let err = h
            .client
            .devices_by_plant(&PlantRequest::new("", "P1", 1))
            .await
            .unwrap_err();

        assert!(matches!(err, OssError::MissingParameter("username")));
        login.assert_hits_async(0).await;
        assert_eq!(h.log.errors_titled(DEVICES_ERROR_TITLE).len(), 1);
    }

    #[tokio::test]
    async fn devices_by_plant_surfaces_server_error() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/oss/getDevicesByPlantList");
                then.status(500);
            })
            .await;
        let h = harness(&server);

        let err = h
            .client
            .devices_by_plant(&PlantRequest::new("A1", "P1", 1))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"), "unexpected message: {err}");
    }

    #[tokio::test]
    async fn devices_by_plant_query_rejects_non_numeric_server_id() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, TEST_TOKEN).await;
        let h = harness(&server);

        let err = h
            .client
            .devices_by_plant_query("P1", "A1", "abc")
            .await
            .unwrap_err();

        assert!(matches!(err, OssError::InvalidParameter { name: "serverId", .. }));
        login.assert_hits_async(0).await;
        let errors = h.log.errors_titled(DEVICES_ERROR_TITLE);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("abc"));
    }

    #[tokio::test]
    async fn devices_by_plant_query_parses_server_id() {
        let server = MockServer::start_async().await;
        let _login = mock_login(&server, TEST_TOKEN).await;
        let endpoint = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/oss/getDevicesByPlantList")
                    .query_param("serverId", "3")
                    .query_param("plantId", "P1")
                    .query_param("username", "A1");
                then.status(200).json_body(json!({ "obj": { "datas": [1] } }));
            })
            .await;
        let h = harness(&server);

        h.client.devices_by_plant_query("P1", "A1", " 3 ").await.unwrap();

        endpoint.assert_hits_async(1).await;
    }

    // -------------------------------
    // transport failures
    // -------------------------------

    #[tokio::test]
    async fn refused_connection_keeps_cause() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let h = harness_at(&format!("http://127.0.0.1:{port}"));

        let err = h.client.active_equipment("P1", "A1").await.unwrap_err();

        let OssError::Http { endpoint, message } = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(*endpoint, "login");
        assert!(message.to_lowercase().contains("connect"), "cause missing: {message}");
        let auth = h.log.errors_titled(AUTH_ERROR_TITLE);
        assert_eq!(auth.len(), 1);
        assert!(auth[0].message.to_lowercase().contains("connect"));
    }

    #[tokio::test]
    async fn callers_share_one_login() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, TEST_TOKEN).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/oss/getActiveEquipaments");
                then.status(200).json_body(json!({ "data": [1] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oss/searchInverter");
                then.status(200).json_body(json!({ "obj": { "k": [1] } }));
            })
            .await;
        let h = harness(&server);

        h.client.active_equipment("P1", "A1").await.unwrap();
        h.client.search_serial_number("SN1").await.unwrap();

        login.assert_hits_async(1).await;
    }
}
