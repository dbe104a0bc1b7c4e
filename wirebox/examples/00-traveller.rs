use tracing_subscriber::EnvFilter;
use wirebox::container::ContainerBuilder;
use wirebox::instance::InstancePtr;
use wirebox::{contract, contract_impl, Constructible};

// a contract is a trait which can be bound to a concrete type
#[contract]
trait Visit {
    fn go(&self);
}

// concrete types become constructible by the container when deriving Constructible
#[derive(Constructible)]
struct Leg;

// telling the container Leg can be injected wherever dyn Visit is expected
#[contract_impl]
impl Visit for Leg {
    fn go(&self) {
        println!("Walking to Tibet!");
    }
}

#[derive(Constructible)]
struct Car;

#[contract_impl]
impl Visit for Car {
    fn go(&self) {
        println!("Driving to Tibet!");
    }
}

#[derive(Constructible)]
struct Train;

#[contract_impl]
impl Visit for Train {
    fn go(&self) {
        println!("Going to Tibet by train!");
    }
}

#[derive(Constructible)]
struct Traveller {
    // resolved by making "Visit", so whatever is bound to it gets injected
    traffic_tool: InstancePtr<dyn Visit + Send + Sync>,
}

impl Traveller {
    fn visit_tibet(&self) {
        self.traffic_tool.go();
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // run with RUST_LOG=wirebox=debug to see what the container does
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // configuration is read from wirebox.json and WIREBOX_* environment variables
    let mut container = ContainerBuilder::from_environment()
        .expect("error reading configuration")
        .build()
        .expect("error building container");

    container.bind("Visit", "Train", false);
    container.bind("traveller", "Traveller", false);

    let traveller = container
        .make_typed::<Traveller>("traveller")
        .expect("error creating traveller");

    // prints "Going to Tibet by train!"
    traveller.visit_tibet();

    // rebinding changes what gets injected, while the traveller stays the same
    container.bind("Visit", "Car", true);

    let traveller = container
        .make_typed::<Traveller>("traveller")
        .expect("error creating traveller");

    // prints "Driving to Tibet!"
    traveller.visit_tibet();

    // factories have full access to the container
    container.bind_factory(
        "hiker",
        |container| {
            let traffic_tool = container.make_typed::<dyn Visit + Send + Sync>("Leg")?;
            Ok(wirebox::instance::Instance::new(Traveller { traffic_tool }))
        },
        false,
    );

    let hiker = container
        .make_typed::<Traveller>("hiker")
        .expect("error creating hiker");

    // prints "Walking to Tibet!"
    hiker.visit_tibet();
}
