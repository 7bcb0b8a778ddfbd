use firmata_adaptor::adaptors::{Adaptor, FirmataAdaptor, I2cConnector};
use firmata_adaptor::errors::Error;
use firmata_adaptor::io::{ClientEvent, I2CReply};
use firmata_adaptor::mocks::{MockFirmataClient, MockTransportLayer};

#[firmata_adaptor::runtime]
async fn main() -> Result<(), Error> {
    let client = MockFirmataClient::default().with_i2c_response(Some(vec![0x1A, 0x2B, 0x3C]));
    let mut adaptor = FirmataAdaptor::new(client).with_transport(MockTransportLayer::opened());
    adaptor.connect()?;

    // Every reply is logged, whoever requested it.
    adaptor.on(ClientEvent::I2cReply, |reply: I2CReply| async move {
        println!("I2C reply from {:#04x}: {:02X?}", reply.address, reply.data);
        Ok(())
    });

    adaptor.i2c_start(0x48)?;
    adaptor.i2c_write(0x48, &[0x00])?;
    let data = adaptor.i2c_read(0x48, 2).await?;
    println!("Temperature sensor registers: {:02X?}", data);

    adaptor.finalize()
}
