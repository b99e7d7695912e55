//! `scan/request`/`scan/response` relay: the request is forwarded to the
//! robot verbatim, the response is only ever logged.

use model::messages::{RobotScanRequest, RobotScanResponse, ScanRequest};

/// Relays a client `scan/request` to the robot queue. A 1:1 field mapping,
/// kept as its own function so the external interface table has one
/// handler per queue.
pub fn relay_scan_request(request: ScanRequest) -> RobotScanRequest {
    RobotScanRequest { scan_id: request.scan_id, aisle_index: request.aisle_index, side: request.side }
}

/// Logs the robot's acknowledgement of a scan request. There is nothing
/// else to do with it: the scan's actual data arrives separately on
/// `scan/data`, and the core keeps no other state keyed off this message.
pub fn log_scan_response(response: &RobotScanResponse) {
    if response.success {
        tracing::info!(scan_id = %response.scan_id, "robot accepted scan request");
    } else {
        tracing::warn!(scan_id = %response.scan_id, error_message = ?response.error_message, "robot rejected scan request");
    }
}
