//! # Integration Test Flows
//!
//! Tests that hh-01-session, hh-02-state-monitor and shared-types work
//! together the way a driver uses them.
//!
//! ## Flows Tested:
//!
//! 1. **Login -> Registry**: a minted token finds its session and validates
//! 2. **Context persistence**: a live context and a driver's connection
//!    config share one stream and restore intact
//! 3. **Driver monitor**: a session-scoped driver starts a monitor, a device
//!    changes state in the background, the driver polls to completion

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::RwLock;

    use hh_01_session::{
        InMemoryAccountStore, LoginApi, LoginError, LoginService, MapEnvironment, SessionConfig,
        SessionError, SessionRegistry, SystemTimeSource, UserAccount, UserContext, UserRole,
    };
    use hh_02_state_monitor::{
        AsyncCompletionMonitor, CheckResult, FieldMatchProbe, FieldReader, MonitorConfig,
        MonitorError, MonitorState, ProbeError, TargetList,
    };
    use hub_telemetry::TelemetryConfig;
    use shared_types::{BinInStream, BinOutStream, Persistable, SerialConnCfg};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn quiet_logging() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::default()
        };
        // Several tests race to install the subscriber; only one wins.
        let _ = hub_telemetry::init_telemetry(&config);
    }

    fn login_service() -> LoginService<InMemoryAccountStore, SystemTimeSource, MapEnvironment> {
        let config = SessionConfig {
            rtv_prefix: "CQC_EnvRTV".to_string(),
            hmac_secret: [0x3C; 32],
            ..SessionConfig::default()
        };
        config.validate_for_production().unwrap();

        let store = InMemoryAccountStore::with_accounts([
            UserAccount::new("admin", "hunter2", UserRole::SystemAdmin, "/User/Admin/Main"),
            UserAccount::new("guest", "guest", UserRole::LimitedUser, "/User/Guest"),
        ])
        .unwrap();
        let host = MapEnvironment::from_pairs([("CQC_EnvRTV1", "Living Room"), ("CQC_EnvRTV3", "Evening")]);

        LoginService::new(config, store, SystemTimeSource, host)
    }

    /// Device field table shared between a simulated device and the probe.
    #[derive(Clone, Default)]
    struct DeviceFields(Arc<RwLock<HashMap<String, String>>>);

    impl DeviceFields {
        fn set(&self, name: &str, value: &str) {
            self.0.write().insert(name.to_owned(), value.to_owned());
        }
    }

    #[async_trait]
    impl FieldReader for DeviceFields {
        async fn read_field(&self, name: &str) -> Result<String, ProbeError> {
            self.0
                .read()
                .get(name)
                .cloned()
                .ok_or_else(|| ProbeError::TargetUnavailable {
                    name: name.to_owned(),
                    reason: "device not reporting".to_owned(),
                })
        }
    }

    fn monitor_config() -> MonitorConfig {
        MonitorConfig {
            poll_interval_ms: 10,
            wait_limit_ms: 3_000,
            shutdown_request_ms: 500,
            shutdown_exit_ms: 200,
        }
    }

    async fn poll_until_done(monitor: &AsyncCompletionMonitor) -> CheckResult {
        loop {
            match monitor.check_result().unwrap() {
                CheckResult::Waiting => tokio::time::sleep(Duration::from_millis(10)).await,
                done => return done,
            }
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: LOGIN -> REGISTRY
    // =============================================================================

    #[test]
    fn test_login_opens_session_found_by_token() {
        quiet_logging();
        let service = login_service();
        let registry = SessionRegistry::new();

        let ctx = service.login("admin", "hunter2").unwrap();
        assert!(ctx.is_logged_in());
        assert_eq!(ctx.display_name(), "System Administrator");
        assert_eq!(ctx.env_rtv_at(0).unwrap(), "Living Room");
        assert_eq!(ctx.env_rtv_at(2).unwrap(), "Evening");
        assert_eq!(ctx.env_rtv_at(1).unwrap(), "");

        let token = ctx.security_token().clone();
        let id = registry.open(ctx);

        assert_eq!(registry.find_by_token(&token), Some(id));
        let claims = service.validate_token(&token).unwrap();
        assert!(claims.expires_at > claims.issued_at);

        registry.update_runtime_value(id, 8, "Movie Night").unwrap();
        assert_eq!(
            registry.get(id).unwrap().env_rtv_at(8).unwrap(),
            "Movie Night"
        );

        registry.close(id).unwrap();
        assert!(registry.find_by_token(&token).is_none());
        assert!(matches!(registry.close(id), Err(SessionError::NotFound(_))));
    }

    #[test]
    fn test_two_logins_get_distinct_tokens() {
        let service = login_service();
        let registry = SessionRegistry::new();

        let a = registry.open(service.login("admin", "hunter2").unwrap());
        let b = registry.open(service.login("guest", "guest").unwrap());
        assert_ne!(a, b);

        let token_a = registry.get(a).unwrap().security_token().clone();
        let token_b = registry.get(b).unwrap().security_token().clone();
        assert_ne!(token_a, token_b);
        assert_eq!(registry.find_by_token(&token_b), Some(b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_rejected_logins_open_nothing() {
        let service = login_service();
        assert!(matches!(
            service.login("admin", "wrong"),
            Err(LoginError::BadPassword(_))
        ));
        assert!(matches!(
            service.login("nobody", "x"),
            Err(LoginError::UnknownAccount(_))
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = login_service();
        let ctx = service.login("guest", "guest").unwrap();

        let mut bytes = ctx.security_token().payload().to_vec();
        bytes[20] ^= 0x01;
        let mut forged = ctx.security_token().clone();
        forged.set(&bytes, bytes.len()).unwrap();

        assert!(matches!(
            service.validate_token(&forged),
            Err(LoginError::TokenForged(_))
        ));
    }

    // =============================================================================
    // INTEGRATION TESTS: PERSISTENCE
    // =============================================================================

    #[test]
    fn test_context_and_conn_cfg_share_one_stream() {
        let service = login_service();
        let ctx = service.login("admin", "hunter2").unwrap();
        let mut serial = SerialConnCfg::new("/dev/ttyS1", 38_400);
        serial.flow_control = true;

        let mut out = BinOutStream::new();
        ctx.encode(&mut out).unwrap();
        serial.encode(&mut out).unwrap();
        let bytes = out.into_bytes();

        let mut input = BinInStream::new(&bytes);
        let restored_ctx = UserContext::decode(&mut input).unwrap();
        let restored_serial = SerialConnCfg::decode(&mut input).unwrap();
        input.finish().unwrap();

        assert_eq!(restored_ctx, ctx);
        assert_eq!(restored_serial, serial);
        // The restored token is still one the service issued.
        service.validate_token(restored_ctx.security_token()).unwrap();
    }

    #[test]
    fn test_closed_session_context_resets_cleanly() {
        let service = login_service();
        let mut ctx = service.login("admin", "hunter2").unwrap();
        ctx.reset();
        assert_eq!(ctx.to_bytes().unwrap(), UserContext::new().to_bytes().unwrap());
    }

    // =============================================================================
    // INTEGRATION TESTS: DRIVER MONITOR
    // =============================================================================

    #[tokio::test]
    async fn test_driver_waits_for_device_power_on() {
        quiet_logging();
        let service = login_service();
        let ctx = service.login("admin", "hunter2").unwrap();
        assert!(ctx.user_role() >= Some(UserRole::PowerUser));

        let device = DeviceFields::default();
        device.set("Projector.Power", "Off");
        device.set("Screen.Position", "Up");

        let mut monitor = AsyncCompletionMonitor::new(
            "ProjectorPower",
            FieldMatchProbe::new(device.clone()),
            monitor_config(),
        )
        .unwrap();
        let targets: TargetList = [("Projector.Power", "On"), ("Screen.Position", "Down")]
            .into_iter()
            .collect();

        monitor.start(&targets, true).unwrap();
        assert_eq!(monitor.check_result().unwrap(), CheckResult::Waiting);

        let simulated = device.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            simulated.set("Projector.Power", "On");
            tokio::time::sleep(Duration::from_millis(50)).await;
            simulated.set("Screen.Position", "Down");
        });

        assert_eq!(poll_until_done(&monitor).await, CheckResult::Complete);

        monitor.cleanup().await;
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(matches!(
            monitor.check_result(),
            Err(MonitorError::NotReady { .. })
        ));
    }

    #[tokio::test]
    async fn test_driver_waits_for_power_off_then_reuses_monitor() {
        let device = DeviceFields::default();
        device.set("Amp.Power", "On");

        let mut monitor = AsyncCompletionMonitor::new(
            "AmpPower",
            FieldMatchProbe::new(device.clone()),
            monitor_config(),
        )
        .unwrap();
        let targets: TargetList = [("Amp.Power", "On")].into_iter().collect();

        // flag=false: complete once the field no longer reads "On".
        monitor.start(&targets, false).unwrap();
        device.set("Amp.Power", "Standby");
        assert_eq!(poll_until_done(&monitor).await, CheckResult::Complete);
        monitor.cleanup().await;

        // Device never reaches the target: the second run times out.
        let short = MonitorConfig {
            wait_limit_ms: 60,
            ..monitor_config()
        };
        let mut monitor =
            AsyncCompletionMonitor::new("AmpPower", FieldMatchProbe::new(device), short).unwrap();
        monitor.start(&targets, true).unwrap();
        assert_eq!(poll_until_done(&monitor).await, CheckResult::Timeout);
        monitor.cleanup().await;
        monitor.start(&targets, true).unwrap();
        monitor.cleanup().await;
    }

    #[tokio::test]
    async fn test_unreporting_device_times_out_without_failing() {
        let device = DeviceFields::default();
        let config = MonitorConfig {
            wait_limit_ms: 80,
            ..monitor_config()
        };
        let mut monitor =
            AsyncCompletionMonitor::new("TvInput", FieldMatchProbe::new(device), config).unwrap();
        let targets: TargetList = [("Tv.Input", "HDMI1")].into_iter().collect();

        monitor.start(&targets, true).unwrap();
        assert_eq!(poll_until_done(&monitor).await, CheckResult::Timeout);
    }
}
