use firmata_adaptor::adaptors::{Adaptor, DigitalReader, DigitalWriter, FirmataAdaptor};
use firmata_adaptor::errors::Error;
use firmata_adaptor::mocks::{MockFirmataClient, MockTransportLayer};
use firmata_adaptor::pause;

#[firmata_adaptor::runtime]
async fn main() -> Result<(), Error> {
    let client = MockFirmataClient::default();
    let mut adaptor = FirmataAdaptor::new(client.clone()).with_transport(MockTransportLayer::opened());
    adaptor.connect()?;

    // Blinks the embedded led (pin 13) 5 times.
    for _ in 0..5 {
        adaptor.digital_write("13", 1)?;
        pause!(250);
        adaptor.digital_write("13", 0)?;
        pause!(250);
    }

    // Pin 10 is switched to INPUT (with reporting) on first read.
    println!("Pin 10 reads {}", adaptor.digital_read("10").await?);

    adaptor.finalize()?;
    println!("Calls received by the client: {:#?}", client.calls());
    Ok(())
}
