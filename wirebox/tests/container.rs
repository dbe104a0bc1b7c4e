#[cfg(feature = "derive")]
mod container_derive_test {
    use std::fmt::{Display, Formatter};
    use wirebox::container::{Container, ContainerBuilder};
    use wirebox::identifier::Identifier;
    use wirebox::instance::{ErrorPtr, Instance, InstancePtr};
    use wirebox::reflect::{Constructible, Parameter};
    use wirebox::{contract, contract_impl, Constructible, ResolutionError};

    #[contract]
    trait Visit {
        fn go(&self) -> &'static str;
    }

    #[derive(Constructible)]
    struct Leg;

    #[contract_impl]
    impl Visit for Leg {
        fn go(&self) -> &'static str {
            "walking"
        }
    }

    #[derive(Constructible)]
    struct Car;

    #[contract_impl]
    impl Visit for Car {
        fn go(&self) -> &'static str {
            "driving"
        }
    }

    #[derive(Constructible)]
    struct Train;

    #[contract_impl]
    impl Visit for Train {
        fn go(&self) -> &'static str {
            "by train"
        }
    }

    #[derive(Constructible)]
    struct Traveller {
        traffic_tool: InstancePtr<dyn Visit + Send + Sync>,
    }

    impl Traveller {
        fn visit_tibet(&self) -> String {
            format!("Going to Tibet {}", self.traffic_tool.go())
        }
    }

    #[derive(Constructible)]
    struct Explorer {
        traffic_tool: InstancePtr<dyn Send + Sync + Visit>,
    }

    fn default_budget() -> u32 {
        100
    }

    #[derive(Constructible)]
    #[constructible(name = "Tourist")]
    struct TouristWithBudget {
        #[inject(name = "Car")]
        car: InstancePtr<Car>,
        #[inject(default = "default_budget")]
        budget: u32,
        days: u8,
    }

    #[derive(Constructible)]
    struct Family(InstancePtr<Traveller>, #[inject(name = "Leg")] InstancePtr<dyn Visit + Send + Sync>);

    #[derive(Debug)]
    struct NoTicket;

    impl Display for NoTicket {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "no ticket")
        }
    }

    impl std::error::Error for NoTicket {}

    #[derive(Constructible)]
    #[constructible(constructor = "Commuter::new")]
    struct Commuter {
        train: InstancePtr<Train>,
        #[inject(ignore)]
        stops: usize,
    }

    impl Commuter {
        fn new(train: InstancePtr<Train>) -> Result<Self, ErrorPtr> {
            Ok(Self { train, stops: 4 })
        }
    }

    #[derive(Constructible)]
    #[constructible(constructor = "Stowaway::new")]
    struct Stowaway;

    impl Stowaway {
        fn new() -> Result<Self, ErrorPtr> {
            Err(InstancePtr::new(NoTicket) as ErrorPtr)
        }
    }

    #[contract(name = "Vehicle")]
    trait Machine {}

    fn create_container() -> Container {
        ContainerBuilder::new().build().unwrap()
    }

    #[test]
    fn should_visit_tibet_by_train() {
        let mut container = create_container();
        container.bind("Visit", "Train", false);
        container.bind("traveller", "Traveller", false);

        let traveller = container.make_typed::<Traveller>("traveller").unwrap();
        assert_eq!(traveller.visit_tibet(), "Going to Tibet by train");
    }

    #[test]
    fn should_derive_parameters_in_declaration_order() {
        assert_eq!(
            TouristWithBudget::parameters(),
            vec![
                Parameter::dependency("Car"),
                Parameter::Placeholder,
                Parameter::Placeholder
            ]
        );
        assert_eq!(Commuter::parameters(), vec![Parameter::dependency("Train")]);
        assert!(Leg::parameters().is_empty());
    }

    #[test]
    fn should_infer_contract_after_auto_traits() {
        assert_eq!(Explorer::parameters(), vec![Parameter::dependency("Visit")]);

        let mut container = create_container();
        container.bind("Visit", "Leg", false);

        let explorer = container.make_typed::<Explorer>("Explorer").unwrap();
        assert_eq!(explorer.traffic_tool.go(), "walking");
    }

    #[test]
    fn should_register_derived_types() {
        let container = create_container();
        let registry = container.registry();

        assert!(registry.is_registered("Traveller"));
        assert!(registry.is_registered("Tourist"));
        assert!(!registry.is_registered("TouristWithBudget"));
        assert!(!registry.descriptor("Visit").unwrap().is_instantiable());
        assert!(registry.is_registered("Vehicle"));
    }

    #[test]
    fn should_make_unbound_concrete_type() {
        let mut container = create_container();

        assert_eq!(
            container.make("Leg").unwrap().type_name(),
            &Identifier::from("Leg")
        );
    }

    #[test]
    fn should_not_instantiate_missing_type() {
        let mut container = create_container();

        assert!(matches!(
            container.make("Plane").unwrap_err(),
            ResolutionError::NotInstantiable(identifier) if identifier == "Plane"
        ));
    }

    #[test]
    fn should_not_instantiate_unbound_contract() {
        let mut container = create_container();

        assert!(matches!(
            container.make("traveller_without_tool").unwrap_err(),
            ResolutionError::NotInstantiable(..)
        ));
        assert!(matches!(
            container.make("Traveller").unwrap_err(),
            ResolutionError::NotInstantiable(identifier) if identifier == "Visit"
        ));
        assert!(matches!(
            container.make("Vehicle").unwrap_err(),
            ResolutionError::NotInstantiable(identifier) if identifier == "Vehicle"
        ));
    }

    #[test]
    fn should_make_alias_like_its_target() {
        let mut container = create_container();
        container.bind("Visit", "Car", false);

        let visit = container.make("Visit").unwrap();
        let car = container.make("Car").unwrap();

        assert_eq!(visit.type_name(), car.type_name());
    }

    #[test]
    fn should_construct_self_binding_directly() {
        let mut container = create_container();
        container.bind_type("Car", false);

        assert!(container.make_typed::<Car>("Car").is_ok());
    }

    #[test]
    fn should_follow_binding_chain() {
        let mut container = create_container();
        container.bind("journey", "Visit", false);
        container.bind("Visit", "Leg", false);

        let visit = container
            .make_typed::<dyn Visit + Send + Sync>("journey")
            .unwrap();
        assert_eq!(visit.go(), "walking");
    }

    #[test]
    fn should_inject_contract_without_binding_consumer() {
        let mut container = create_container();
        container.bind("Visit", "Car", false);

        let traveller = container.make_typed::<Traveller>("Traveller").unwrap();
        assert_eq!(traveller.traffic_tool.go(), "driving");
    }

    #[test]
    fn should_fill_placeholders_with_defaults() {
        let mut container = create_container();

        let tourist = container
            .make_typed::<TouristWithBudget>("Tourist")
            .unwrap();
        assert_eq!(tourist.budget, 100);
        assert_eq!(tourist.days, 0);
        assert_eq!(tourist.car.go(), "driving");
    }

    #[test]
    fn should_construct_tuple_structs() {
        let mut container = create_container();
        container.bind("Visit", "Train", false);

        let family = container.make_typed::<Family>("Family").unwrap();
        assert_eq!(family.0.traffic_tool.go(), "by train");
        assert_eq!(family.1.go(), "walking");
    }

    #[test]
    fn should_use_custom_constructor() {
        let mut container = create_container();

        let commuter = container.make_typed::<Commuter>("Commuter").unwrap();
        assert_eq!(commuter.stops, 4);
        assert_eq!(commuter.train.go(), "by train");
    }

    #[test]
    fn should_report_constructor_errors() {
        let mut container = create_container();

        match container.make("Stowaway").unwrap_err() {
            ResolutionError::ConstructionFailed { identifier, error } => {
                assert_eq!(identifier, "Stowaway");
                assert_eq!(error.to_string(), "no ticket");
            }
            error => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn should_create_new_instances_for_every_make() {
        let mut container = create_container();
        container.bind("Visit", "Train", false);

        let first = container.make("Visit").unwrap();
        let second = container.make("Visit").unwrap();
        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn should_share_instances_of_shared_bindings() {
        let mut container = create_container();
        container.bind("Visit", "Train", true);
        container.bind("Traveller", "Traveller", false);

        let first = container.make_typed::<Traveller>("Traveller").unwrap();
        let second = container.make_typed::<Traveller>("Traveller").unwrap();

        assert!(!InstancePtr::ptr_eq(&first, &second));
        assert!(InstancePtr::ptr_eq(
            &first.traffic_tool,
            &second.traffic_tool
        ));
    }

    #[test]
    fn should_detect_binding_cycles() {
        let mut container = create_container();
        container.bind("A", "B", false);
        container.bind("B", "A", false);

        assert!(matches!(
            container.make("A").unwrap_err(),
            ResolutionError::DependencyCycle(path) if path.len() == 3
        ));
    }

    #[test]
    fn should_detect_cycles_through_constructor_dependencies() {
        let mut container = create_container();
        container.bind("Visit", "Traveller", false);

        // Traveller needs Visit, which resolves back to Traveller
        assert!(matches!(
            container.make("Traveller").unwrap_err(),
            ResolutionError::DependencyCycle(..)
        ));
    }

    #[test]
    fn should_wire_factories_with_container_access() {
        let mut container = create_container();
        container.bind("Visit", "Leg", false);
        container.bind_factory(
            "lazy_traveller",
            |container| {
                let traffic_tool = container.make_typed::<dyn Visit + Send + Sync>("Car")?;
                Ok(Instance::new(Traveller { traffic_tool }))
            },
            false,
        );

        let traveller = container
            .make_typed::<Traveller>("lazy_traveller")
            .unwrap();
        assert_eq!(traveller.traffic_tool.go(), "driving");
    }

    #[test]
    fn should_cast_factory_instances_to_contracts() {
        let mut container = create_container();
        container.bind_factory("Visit", |_| Ok(Instance::new(Train)), false);

        let visit = container.make("Visit").unwrap();
        assert_eq!(visit.type_name(), &Identifier::from("Train"));
        assert!(visit.can_cast::<dyn Visit + Send + Sync>());
    }
}
