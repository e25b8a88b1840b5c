//! Vendor command scripts.
//!
//! One gathering pass per device: fixed command sequences per vendor/OS,
//! with a probe on the interface table to learn the first interface name
//! before asking for its hardware address. The probe line offset differs per
//! OS because each prints a different number of header lines.

use driftwatch_common::{DeviceSession, PollError, PollResult};
use driftwatch_extract::CommandOutputs;
use driftwatch_types::DeviceKind;

/// Returns the full-configuration capture command for a vendor/OS.
pub fn config_command(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::CiscoIos | DeviceKind::CiscoXr => "show running-config",
        DeviceKind::JuniperJunos => "show configuration",
    }
}

/// First data line of the interface table, per OS.
fn probe_offset(kind: DeviceKind) -> usize {
    match kind {
        DeviceKind::CiscoIos => 1,
        DeviceKind::CiscoXr => 4,
        DeviceKind::JuniperJunos => 1,
    }
}

/// Extracts the first interface name from the interface table output.
fn first_interface(table: &str, offset: usize) -> Option<&str> {
    table.lines().nth(offset)?.split_whitespace().next()
}

/// Runs the info-gathering command sequence for one device.
///
/// `with_bandwidth` additionally captures the full interface dump used for
/// CLI-method bandwidth extraction; the SNMP method skips it because speed
/// and throughput come from the agent instead.
pub async fn gather(
    session: &mut dyn DeviceSession,
    kind: DeviceKind,
    with_bandwidth: bool,
) -> PollResult<CommandOutputs> {
    match kind {
        DeviceKind::CiscoIos | DeviceKind::CiscoXr => {
            if kind == DeviceKind::CiscoIos {
                session.run_command("enable").await?;
            }

            let hostname = session
                .run_command("show running-config | include hostname")
                .await?;
            let interfaces = session.run_command("show ip interface brief").await?;

            let probe = first_interface(&interfaces, probe_offset(kind))
                .ok_or_else(|| PollError::parse("no interface data in brief output"))?;
            let hardware = session
                .run_command(&format!("show interfaces {probe} | include address"))
                .await?;

            let neighbors = session.run_command("show cdp neighbors").await?;
            let all_interfaces = if with_bandwidth {
                Some(session.run_command("show interfaces").await?)
            } else {
                None
            };

            Ok(CommandOutputs {
                hostname,
                interfaces,
                hardware,
                neighbors: Some(neighbors),
                all_interfaces,
            })
        }
        DeviceKind::JuniperJunos => {
            session.run_command("cli").await?;
            session.run_command("set cli screen-length 0").await?;

            let hostname = session
                .run_command("show configuration system host-name")
                .await?;
            let interfaces = session.run_command("show interfaces terse").await?;

            let probe = first_interface(&interfaces, probe_offset(kind))
                .ok_or_else(|| PollError::parse("no interface data in terse output"))?;
            let hardware = session
                .run_command(&format!("show interfaces {probe} | match Hardware"))
                .await?;

            let all_interfaces = if with_bandwidth {
                Some(session.run_command("show interfaces extensive").await?)
            } else {
                None
            };

            Ok(CommandOutputs {
                hostname,
                interfaces,
                hardware,
                neighbors: None,
                all_interfaces,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// Session fake that records the commands it was asked to run and
    /// answers the interface-table command with a canned brief.
    struct ScriptedSession {
        brief_command: &'static str,
        brief: &'static str,
        log: Vec<String>,
    }

    #[async_trait]
    impl DeviceSession for ScriptedSession {
        async fn run_command(&mut self, command: &str) -> PollResult<String> {
            self.log.push(command.to_string());
            if command == self.brief_command {
                Ok(self.brief.to_string())
            } else {
                Ok(String::new())
            }
        }

        async fn close(&mut self) {}
    }

    const IOS_BRIEF: &str = "\
Interface                  IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0         192.0.2.1       YES NVRAM  up                    up
GigabitEthernet0/1         unassigned      YES NVRAM  administratively down down";

    const XR_BRIEF: &str = "\
Thu Mar 12 10:22:41.110 UTC

Interface                      IP-Address      Status          Protocol Vrf-Name
Loopback0                      10.0.0.1        Up              Up       default
GigabitEthernet0/0/0/0         192.0.2.2       Up              Up       default";

    #[tokio::test]
    async fn test_ios_sequence_and_probe() {
        let mut session = ScriptedSession {
            brief_command: "show ip interface brief",
            brief: IOS_BRIEF,
            log: Vec::new(),
        };

        let outputs = gather(&mut session, DeviceKind::CiscoIos, true)
            .await
            .unwrap();
        assert_eq!(
            session.log,
            vec![
                "enable",
                "show running-config | include hostname",
                "show ip interface brief",
                "show interfaces GigabitEthernet0/0 | include address",
                "show cdp neighbors",
                "show interfaces",
            ]
        );
        assert!(outputs.neighbors.is_some());
        assert!(outputs.all_interfaces.is_some());
    }

    #[tokio::test]
    async fn test_xr_probe_skips_longer_header() {
        let mut session = ScriptedSession {
            brief_command: "show ip interface brief",
            brief: XR_BRIEF,
            log: Vec::new(),
        };

        gather(&mut session, DeviceKind::CiscoXr, false)
            .await
            .unwrap();
        // No enable on XR; probe lands on the line after Loopback0's header
        // block, which is the fifth line.
        assert_eq!(session.log[0], "show running-config | include hostname");
        assert!(session
            .log
            .contains(&"show interfaces GigabitEthernet0/0/0/0 | include address".to_string()));
        assert!(!session.log.contains(&"show interfaces".to_string()));
    }

    #[tokio::test]
    async fn test_juniper_sequence() {
        let mut session = ScriptedSession {
            brief_command: "show interfaces terse",
            brief: "Interface               Admin Link Proto    Local                 Remote\nge-0/0/0                up    up\nge-0/0/0.0              up    up   inet     192.0.2.3/24",
            log: Vec::new(),
        };

        let outputs = gather(&mut session, DeviceKind::JuniperJunos, true)
            .await
            .unwrap();
        assert_eq!(session.log[0], "cli");
        assert_eq!(session.log[1], "set cli screen-length 0");
        assert!(session
            .log
            .contains(&"show interfaces ge-0/0/0 | match Hardware".to_string()));
        assert!(session
            .log
            .contains(&"show interfaces extensive".to_string()));
        assert!(outputs.neighbors.is_none());
    }

    #[tokio::test]
    async fn test_empty_interface_table_is_parse_failure() {
        let mut session = ScriptedSession {
            brief_command: "show ip interface brief",
            brief: "Interface                  IP-Address      OK? Method Status                Protocol",
            log: Vec::new(),
        };

        let err = gather(&mut session, DeviceKind::CiscoIos, false)
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Parse { .. }));
    }

    #[test]
    fn test_config_commands() {
        assert_eq!(config_command(DeviceKind::CiscoIos), "show running-config");
        assert_eq!(config_command(DeviceKind::CiscoXr), "show running-config");
        assert_eq!(
            config_command(DeviceKind::JuniperJunos),
            "show configuration"
        );
    }
}
