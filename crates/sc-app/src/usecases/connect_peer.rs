use std::sync::Arc;

use anyhow::Result;
use sc_core::ports::{DialOutcome, NetworkPort, NotifierPort};
use sc_core::Notice;
use tracing::{debug, info, info_span, Instrument};

/// Where a connection request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOrigin {
    /// A share link passed on the command line.
    Startup,
    /// Typed by the user at runtime.
    User,
}

/// Opens a connection to another instance.
///
/// A blank target is ignored and yields `None`.
pub struct ConnectPeer {
    network: Arc<dyn NetworkPort>,
    notifier: Arc<dyn NotifierPort>,
}

impl ConnectPeer {
    pub fn new(network: Arc<dyn NetworkPort>, notifier: Arc<dyn NotifierPort>) -> Self {
        Self { network, notifier }
    }

    pub async fn execute(
        &self,
        target: &str,
        origin: ConnectOrigin,
    ) -> Result<Option<DialOutcome>> {
        let target = target.trim();
        let span = info_span!("usecase.network.connect.execute", target = %target, origin = ?origin);

        async move {
            if target.is_empty() {
                debug!("Ignoring empty peer address");
                return Ok(None);
            }

            let outcome = self.network.dial(target).await?;
            match outcome {
                DialOutcome::SelfDial => debug!("Ignoring link to this device"),
                DialOutcome::AlreadyConnected => debug!("Peer already connected"),
                DialOutcome::Dialing => {
                    info!("Dialing peer");
                    if origin == ConnectOrigin::Startup {
                        self.notifier.notify(Notice::LinkingDevice);
                    }
                }
            }
            Ok(Some(outcome))
        }
        .instrument(span)
        .await
    }
}
