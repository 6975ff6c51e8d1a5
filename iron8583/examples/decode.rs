//! Decode and validate a financial request, then build the matching
//! response.

use iron8583::prelude::*;
use tracing::{error, info};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let spec: &'static _ = Box::leak(Box::new(iso8583_1987_ascii()));

    // A 0200 purchase request as it arrives off the wire.
    let request = MessageBuilder::new(&spec)
        .set_mti("0200")
        .set_string(2, "4532015112830366")
        .set_string(3, "000000")
        .set_int(4, 1000)
        .set_int(11, 123456)
        .set_string(41, "TERM0001")
        .build_bytes()?;

    let mut msg = Message::new(&request, &spec);
    msg.parse()?;
    info!(mti = %msg.mti().as_str(), "parsed request");

    for number in msg.present_fields() {
        let field = msg.field(number);
        if field.exists() {
            info!(field = number, value = %field.as_str(), "data element");
        }
    }

    let validator = CompositeValidator::new()
        .with(FormatValidator::new(&spec).with_mandatory([2, 3, 4, 11]))
        .with(
            BusinessValidator::new()
                .with_rule(LuhnCheck::new(2))
                .with_rule(NumericFields::new(vec![3, 4, 11])),
        );
    match msg.validate(Some(&validator)) {
        Ok(()) => info!("request valid"),
        Err(e) => {
            error!(error = %e, "request rejected");
            return Err(e);
        }
    }

    // Approve: echo the request keys, add auth id and response code.
    let response = MessageBuilder::new(&spec)
        .set_mti("0210")
        .set_bytes(2, msg.field(2).bytes())
        .set_bytes(3, msg.field(3).bytes())
        .set_bytes(4, msg.field(4).bytes())
        .set_bytes(11, msg.field(11).bytes())
        .set_string(38, "A12345")
        .set_string(39, "00")
        .build()?;

    info!(
        mti = %response.message_type(),
        bytes = response.as_bytes().len(),
        "built response"
    );
    Ok(())
}
